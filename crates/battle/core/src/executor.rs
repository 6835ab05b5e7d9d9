//! Applies resolved action effects to the roster and the stat provider.
//!
//! Every function here finishes what it starts: all provider writes for one
//! action happen before it returns, so an aborted battle never leaves a
//! half-applied action behind. Team legality is enforced at this layer —
//! support actions stay inside the actor's team, offense stays outside it.

use crate::damage;
use crate::env::{BattleEnv, HurtKind, ItemId, SkillData};
use crate::error::BattleError;
use crate::state::{BattlefieldGrid, CombatantRoster, Facing, Layer, Position};
use crate::targeting::{self, AreaParams, AreaTemplate};

/// Where a consumed item came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemSource {
    /// The party's shared bag.
    Bag,
    /// The character's own carried slots.
    Carried,
}

/// Which resource an item use is meant to restore.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreKind {
    Health,
    Mana,
    Stamina,
}

/// One target hit by an attack sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub target: usize,
    pub amount: i32,
    pub killed: bool,
}

/// Moves a combatant, maintaining the occupancy layer and facing.
pub fn move_combatant(
    grid: &mut BattlefieldGrid,
    roster: &mut CombatantRoster,
    index: usize,
    to: Position,
) {
    let Some(combatant) = roster.get_mut(index) else {
        return;
    };
    let from = combatant.position;
    if grid.get(Layer::Occupancy, from) == index as i16 {
        grid.set(Layer::Occupancy, from, BattlefieldGrid::EMPTY);
    }
    combatant.facing = Facing::toward(from, to);
    combatant.position = to;
    grid.set(Layer::Occupancy, to, index as i16);
}

/// Skill attack: marks the area template around `anchor`, then damages every
/// legal occupant of a marked cell. Allies are skipped (the actor itself is
/// not — a skill dropped on your own cell hits you), each hit is resolved
/// and written back independently, and a kill awards the attacker
/// `target level × 10` experience.
pub fn attack_with_skill(
    grid: &mut BattlefieldGrid,
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    attacker: usize,
    skill: &SkillData,
    level: i32,
    anchor: Position,
    difficulty: i32,
) -> Vec<Hit> {
    let Some(origin) = roster.get(attacker).map(|c| c.position) else {
        return Vec::new();
    };

    targeting::mark_attack_area(
        grid,
        AreaTemplate::from_code(skill.area_code),
        AreaParams {
            anchor,
            origin,
            range: skill.range_at(level),
            step: skill.step_at(level),
        },
    );

    let attacker_team = roster.get(attacker).map(|c| c.team);
    let mut hits = Vec::new();
    for index in 0..roster.count() {
        let Some(target) = roster.get(index) else {
            continue;
        };
        if target.dead || grid.get(Layer::AttackRange, target.position) == 0 {
            continue;
        }
        if Some(target.team) == attacker_team && index != attacker {
            continue;
        }

        let amount = damage::hurt_value(
            roster,
            &*env.characters,
            &mut *env.rng,
            attacker,
            index,
            skill,
            level,
            difficulty,
        );
        let killed = apply_hurt(grid, roster, env, attacker, index, skill.hurt, amount);
        hits.push(Hit {
            target: index,
            amount,
            killed,
        });
    }
    hits
}

/// Plain physical strike for actors without usable skill data:
/// `max(1, attack − defense/2)` to HP.
pub fn flat_strike(
    grid: &mut BattlefieldGrid,
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    attacker: usize,
    target: usize,
) -> Result<Hit, BattleError> {
    let (attacker_info, target_info) = match (roster.get(attacker), roster.get(target)) {
        (Some(a), Some(t)) => ((a.team, a.character), (t.team, t.character, t.position)),
        _ => return Err(BattleError::NoSuchCombatant(attacker.max(target))),
    };
    if target_info.0 == attacker_info.0 {
        return Err(BattleError::WrongTeam(target_info.2));
    }

    let attacker_stats = env.characters.stats(attacker_info.1);
    let target_stats = env.characters.stats(target_info.1);
    let amount = (attacker_stats.attack - target_stats.defense / 2).max(1);
    let killed = apply_hurt(grid, roster, env, attacker, target, HurtKind::Health, amount);
    Ok(Hit {
        target,
        amount,
        killed,
    })
}

/// Applies one resolved hurt magnitude; returns whether the target died.
fn apply_hurt(
    grid: &mut BattlefieldGrid,
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    attacker: usize,
    target: usize,
    kind: HurtKind,
    amount: i32,
) -> bool {
    let Some((character, position)) = roster.get(target).map(|c| (c.character, c.position)) else {
        return false;
    };
    let stats = env.characters.stats(character);
    let mut killed = false;
    match kind {
        HurtKind::Health => {
            let hp = (stats.hp - amount).max(0);
            env.characters.set_hp(character, hp);
            killed = hp == 0;
        }
        HurtKind::Mana => {
            env.characters.set_mp(character, (stats.mp - amount).max(0));
        }
    }

    if let Some(target_combatant) = roster.get_mut(target) {
        target_combatant.last_shown = amount.min(i16::MAX as i32) as i16;
        if killed {
            target_combatant.dead = true;
        }
    }
    if killed {
        if grid.get(Layer::Occupancy, position) == target as i16 {
            grid.set(Layer::Occupancy, position, BattlefieldGrid::EMPTY);
        }
        let level = env.characters.stats(character).level;
        if let Some(attacker_combatant) = roster.get_mut(attacker) {
            attacker_combatant.exp_gained += level * 10;
        }
    }
    killed
}

/// Shared preamble of the support actions: team legality plus the flat
/// 5-point stamina cost on the actor.
fn support_preamble(
    roster: &CombatantRoster,
    env: &mut BattleEnv<'_>,
    actor: usize,
    target: usize,
    friendly: bool,
) -> Result<(crate::state::CharacterId, crate::state::CharacterId), BattleError> {
    let (Some(a), Some(t)) = (roster.get(actor), roster.get(target)) else {
        return Err(BattleError::NoSuchCombatant(actor.max(target)));
    };
    let same_team = a.team == t.team;
    if friendly != same_team {
        return Err(BattleError::WrongTeam(t.position));
    }

    let stats = env.characters.stats(a.character);
    env.characters.set_phy_power(
        a.character,
        (stats.phy_power - crate::config::BattleConfig::SUPPORT_PHY_COST).max(0),
    );
    Ok((a.character, t.character))
}

/// Medicine treatment of an ally; returns the HP restored.
pub fn heal(
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    healer: usize,
    target: usize,
) -> Result<i32, BattleError> {
    let (healer_id, target_id) = support_preamble(roster, env, healer, target, true)?;
    let healer_stats = env.characters.stats(healer_id);
    let target_stats = env.characters.stats(target_id);

    let mut amount = damage::heal_value(&healer_stats, &target_stats);
    amount = amount.min(target_stats.max_hp - target_stats.hp);
    env.characters.set_hp(target_id, target_stats.hp + amount);
    env.characters
        .set_injury(target_id, (target_stats.injury - amount / 10).max(0));

    if amount > 0
        && let Some(combatant) = roster.get_mut(healer)
    {
        combatant.exp_gained += amount / 5 + amount / 10;
    }
    if let Some(combatant) = roster.get_mut(target) {
        combatant.last_shown = amount as i16;
    }
    Ok(amount)
}

/// Cure-poison treatment of an ally; returns the poison removed.
pub fn cure_poison(
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    healer: usize,
    target: usize,
) -> Result<i32, BattleError> {
    let (healer_id, target_id) = support_preamble(roster, env, healer, target, true)?;
    let amount = damage::cure_poison_value(
        &env.characters.stats(healer_id),
        &env.characters.stats(target_id),
    );

    let poison = env.characters.stats(target_id).poison;
    env.characters.set_poison(target_id, poison - amount);
    if amount > 0
        && let Some(combatant) = roster.get_mut(healer)
    {
        combatant.exp_gained += amount / 5;
    }
    if let Some(combatant) = roster.get_mut(target) {
        combatant.last_shown = amount as i16;
    }
    Ok(amount)
}

/// Defrost treatment of an ally. The frozen meter itself lives outside the
/// battle's stat contract, so this reports the thaw magnitude for display
/// while still charging the usual support costs.
pub fn defrost(
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    healer: usize,
    target: usize,
) -> Result<i32, BattleError> {
    let (healer_id, _target_id) = support_preamble(roster, env, healer, target, true)?;
    let amount = damage::defrost_value(&env.characters.stats(healer_id));
    if let Some(combatant) = roster.get_mut(target) {
        combatant.last_shown = amount as i16;
    }
    Ok(amount)
}

/// Deliberate poisoning of an enemy; returns the poison added.
pub fn apply_poison(
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    attacker: usize,
    target: usize,
) -> Result<i32, BattleError> {
    let (attacker_id, target_id) = support_preamble(roster, env, attacker, target, false)?;
    let amount = damage::apply_poison_value(
        &env.characters.stats(attacker_id),
        &env.characters.stats(target_id),
    );

    let poison = env.characters.stats(target_id).poison;
    env.characters.set_poison(target_id, poison + amount);
    if amount > 0
        && let Some(combatant) = roster.get_mut(attacker)
    {
        combatant.exp_gained += amount / 5;
    }
    if let Some(combatant) = roster.get_mut(target) {
        combatant.last_shown = amount as i16;
    }
    Ok(amount)
}

/// Hidden-weapon throw at an enemy: consumes one carried unit, damages HP
/// with the proficiency-scaled magnitude, and delivers the weapon's poison.
pub fn hidden_weapon(
    grid: &mut BattlefieldGrid,
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    attacker: usize,
    target: usize,
    item: ItemId,
) -> Result<Hit, BattleError> {
    let (Some(a), Some(t)) = (roster.get(attacker), roster.get(target)) else {
        return Err(BattleError::NoSuchCombatant(attacker.max(target)));
    };
    if a.team == t.team {
        return Err(BattleError::WrongTeam(t.position));
    }
    let weapon = env
        .items
        .battle_effects(item)
        .ok_or(BattleError::NoUsableItem)?;

    let attacker_id = a.character;
    let target_id = t.character;
    env.characters.consume_carried(attacker_id, item);

    let (hurt, poison_add) = damage::hidden_weapon_values(
        &env.characters.stats(attacker_id),
        &env.characters.stats(target_id),
        &weapon,
    );
    let killed = apply_hurt(grid, roster, env, attacker, target, HurtKind::Health, hurt);
    let poison = env.characters.stats(target_id).poison;
    env.characters
        .set_poison(target_id, (poison + poison_add).min(100));

    Ok(Hit {
        target,
        amount: hurt,
        killed,
    })
}

/// Consumes an item and applies its restores to the user. Returns the
/// largest single restore applied, for display.
pub fn use_item(
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    user: usize,
    item: ItemId,
    source: ItemSource,
) -> Result<i32, BattleError> {
    let character = roster
        .get(user)
        .map(|c| c.character)
        .ok_or(BattleError::NoSuchCombatant(user))?;
    let effects = env
        .items
        .battle_effects(item)
        .ok_or(BattleError::NoUsableItem)?;

    let stats = env.characters.stats(character);
    let mut shown = 0;
    if effects.restore_hp != 0 {
        let hp = (stats.hp + effects.restore_hp as i32).clamp(0, stats.max_hp);
        env.characters.set_hp(character, hp);
        shown = shown.max(hp - stats.hp);
    }
    if effects.restore_mp != 0 {
        let mp = (stats.mp + effects.restore_mp as i32).clamp(0, stats.max_mp);
        env.characters.set_mp(character, mp);
        shown = shown.max(mp - stats.mp);
    }
    if effects.restore_stamina != 0 {
        let phy = (stats.phy_power + effects.restore_stamina as i32).clamp(0, 100);
        env.characters.set_phy_power(character, phy);
        shown = shown.max(phy - stats.phy_power);
    }
    if effects.poison != 0 {
        let poison = (stats.poison + effects.poison as i32).clamp(0, 99);
        env.characters.set_poison(character, poison);
    }

    match source {
        ItemSource::Bag => env.characters.consume_bag(item),
        ItemSource::Carried => env.characters.consume_carried(character, item),
    }
    if let Some(combatant) = roster.get_mut(user) {
        combatant.last_shown = shown as i16;
    }
    Ok(shown)
}

/// Picks the best available item for the wanted restore and uses it.
/// Player-team characters draw from the shared bag, everyone else from
/// their carried slots. Returns `None` when nothing applicable is held.
pub fn auto_use_item(
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    user: usize,
    want: RestoreKind,
) -> Option<i32> {
    let combatant = roster.get(user)?;
    let character = combatant.character;
    let source = if combatant.team.is_player_side() {
        ItemSource::Bag
    } else {
        ItemSource::Carried
    };

    let candidates: Vec<ItemId> = match source {
        ItemSource::Bag => env
            .characters
            .bag_items()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(item, _)| item)
            .collect(),
        ItemSource::Carried => env
            .characters
            .carried_items(character)
            .into_iter()
            .filter(|c| c.count > 0)
            .map(|c| c.item)
            .collect(),
    };

    let mut best: Option<(ItemId, i32)> = None;
    for item in candidates {
        let Some(effects) = env.items.battle_effects(item) else {
            continue;
        };
        let value = match want {
            RestoreKind::Health => effects.restore_hp,
            RestoreKind::Mana => effects.restore_mp,
            RestoreKind::Stamina => effects.restore_stamina,
        } as i32;
        if value > 0 && best.is_none_or(|(_, v)| value > v) {
            best = Some((item, value));
        }
    }

    let (item, _) = best?;
    use_item(roster, env, user, item, source).ok()
}

/// Start-of-turn poison damage: the meter bleeds `poison/10` HP. Can kill;
/// a kill this way credits no one.
pub fn poison_tick(
    grid: &mut BattlefieldGrid,
    roster: &mut CombatantRoster,
    env: &mut BattleEnv<'_>,
    index: usize,
) -> i32 {
    let Some(character) = roster.get(index).filter(|c| c.is_alive()).map(|c| c.character) else {
        return 0;
    };
    let stats = env.characters.stats(character);
    let amount = stats.poison / 10;
    if amount <= 0 {
        return 0;
    }

    let hp = (stats.hp - amount).max(0);
    env.characters.set_hp(character, hp);
    if let Some(combatant) = roster.get_mut(index) {
        combatant.last_shown = amount as i16;
        if hp == 0 {
            combatant.dead = true;
            let position = combatant.position;
            if grid.get(Layer::Occupancy, position) == index as i16 {
                grid.set(Layer::Occupancy, position, BattlefieldGrid::EMPTY);
            }
        }
    }
    amount
}
