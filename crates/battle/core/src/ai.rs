//! Autonomous turn logic for non-player combatants.
//!
//! A strict priority chain, evaluated once per turn: emergency self-care
//! first (HP, then MP, then stamina, each behind a probability gate so
//! enemies are not perfectly efficient), then offense — thrown weapon if in
//! range, skill or plain strike when adjacent, otherwise close the distance
//! through the movement planner. The first branch that scores an action ends
//! the turn.

use crate::env::BattleEnv;
use crate::executor::{self, Hit, RestoreKind};
use crate::movement;
use crate::state::{ActionCost, BattlefieldGrid, CombatantRoster, Position};

/// What the AI did with its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiAction {
    HealedSelf(i32),
    UsedItem(RestoreKind, i32),
    ThrewWeapon(Hit),
    Attacked(Vec<Hit>),
    Moved(Position),
    /// No enemy left to act against.
    Idle,
}

impl AiAction {
    /// Progress charge for the chosen branch: self-care and throws are
    /// support actions, everything else resets the meter.
    pub fn cost(&self) -> ActionCost {
        match self {
            AiAction::HealedSelf(_) | AiAction::UsedItem(..) | AiAction::ThrewWeapon(_) => {
                ActionCost::Support
            }
            AiAction::Attacked(_) | AiAction::Moved(_) | AiAction::Idle => ActionCost::Standard,
        }
    }
}

/// Minimum hidden-weapon proficiency before the AI considers throwing.
const THROW_PROFICIENCY: i32 = 30;

/// Runs one full AI turn for `actor`. The caller applies the returned
/// action's progress cost.
pub fn take_turn(
    grid: &mut BattlefieldGrid,
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    actor: usize,
    difficulty: i32,
) -> AiAction {
    let Some(combatant) = roster.get(actor) else {
        return AiAction::Idle;
    };
    let acted = combatant.acted;
    let character = combatant.character;
    let position = combatant.position;
    let stats = env.characters.stats(character);

    // 1. Critical HP: treat or medicate, 70% of the time.
    if !acted && stats.hp < stats.max_hp / 5 && env.rng.chance(70) {
        if stats.medicine >= 50 && stats.phy_power >= 50 && env.rng.chance(50) {
            if let Ok(amount) = executor::heal(roster, env, actor, actor) {
                return AiAction::HealedSelf(amount);
            }
        }
        if let Some(amount) = executor::auto_use_item(roster, env, actor, RestoreKind::Health) {
            return AiAction::UsedItem(RestoreKind::Health, amount);
        }
    }

    // 2. Low mana: 60% chance to drink for it.
    if stats.mp < stats.max_mp / 5 && env.rng.chance(60) {
        if let Some(amount) = executor::auto_use_item(roster, env, actor, RestoreKind::Mana) {
            return AiAction::UsedItem(RestoreKind::Mana, amount);
        }
    }

    // 3. Exhausted: 80% chance to restore stamina.
    if stats.phy_power < 20 && env.rng.chance(80) {
        if let Some(amount) = executor::auto_use_item(roster, env, actor, RestoreKind::Stamina) {
            return AiAction::UsedItem(RestoreKind::Stamina, amount);
        }
    }

    // 4. Offense against the nearest living enemy.
    let Some((target, distance)) = nearest_enemy(roster, actor) else {
        return AiAction::Idle;
    };

    // Thrown weapon first: proficiency-gated, range from the same stat.
    if stats.hidden_weapon >= THROW_PROFICIENCY {
        let range = stats.hidden_weapon / 15 + 1;
        if distance <= range {
            let throwable = env
                .characters
                .carried_items(character)
                .into_iter()
                .filter(|c| c.count > 0)
                .find(|c| {
                    env.items
                        .battle_effects(c.item)
                        .is_some_and(|e| e.restore_hp < 0)
                });
            if let Some(carried) = throwable {
                if let Ok(hit) =
                    executor::hidden_weapon(grid, roster, env, actor, target, carried.item)
                {
                    return AiAction::ThrewWeapon(hit);
                }
            }
        }
    }

    if distance <= 1 {
        // Adjacent: lead with the first known skill, or fall back to a
        // plain strike when no usable skill data exists.
        let skill = env
            .characters
            .known_skills(character)
            .first()
            .and_then(|known| {
                env.skills
                    .skill(known.skill)
                    .map(|data| (data, known.level()))
            });
        let anchor = roster.get(target).map(|c| c.position).unwrap_or(position);
        match skill {
            Some((data, level)) => {
                let hits = executor::attack_with_skill(
                    grid, roster, env, actor, &data, level, anchor, difficulty,
                );
                return AiAction::Attacked(hits);
            }
            None => {
                if let Ok(hit) = executor::flat_strike(grid, roster, env, actor, target) {
                    return AiAction::Attacked(vec![hit]);
                }
            }
        }
        return AiAction::Idle;
    }

    // Out of reach: step to the reachable cell closest to the target.
    let goal = roster.get(target).map(|c| c.position).unwrap_or(position);
    movement::plan_movement(grid, roster, actor);
    let destination = movement::best_approach(grid, position, goal);
    if destination != position {
        executor::move_combatant(grid, roster, actor, destination);
    }
    AiAction::Moved(destination)
}

/// Nearest living opponent by Manhattan distance, with that distance.
fn nearest_enemy(roster: &CombatantRoster, actor: usize) -> Option<(usize, i32)> {
    let me = roster.get(actor)?;
    roster
        .living()
        .filter(|(index, c)| *index != actor && c.team != me.team)
        .map(|(index, c)| (index, me.position.manhattan(c.position)))
        .min_by_key(|&(index, distance)| (distance, index))
}
