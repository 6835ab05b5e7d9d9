//! Turn orchestration state machine.
//!
//! [`BattleEngine`] owns the field grid and the roster for one battle and
//! drives `Scheduling → {player | AI} turn → termination check` until one
//! side is eliminated. Player turns are modeled sans-IO: [`BattleEngine::tick`]
//! suspends with [`BattleSignal::PlayerPrompt`] and the caller resumes with a
//! [`PlayerCommand`] once input arrives. The engine never blocks and performs
//! no I/O of its own; collaborator access goes through the [`BattleEnv`]
//! passed to each call.

use crate::ai::{self, AiAction};
use crate::config::BattleConfig;
use crate::encounter::EncounterDefinition;
use crate::env::BattleEnv;
use crate::error::BattleError;
use crate::executor::{self, ItemSource};
use crate::movement;
use crate::state::{
    ActionCost, BattlefieldGrid, Combatant, CombatantRoster, Layer, Position, TeamId,
};

/// Where the state machine currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum BattlePhase {
    /// Advancing initiative until someone is ready.
    Scheduling,
    /// Suspended: waiting for a player command for this roster index.
    PlayerTurn(usize),
    /// One side has no living members left.
    Ended,
}

/// What one engine step produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleSignal {
    /// A progress tick passed without anyone becoming ready.
    Progressed,
    /// A player-controlled combatant is ready; submit a [`PlayerCommand`]
    /// via [`BattleEngine::resume`].
    PlayerPrompt { actor: usize },
    /// An AI-controlled combatant took its turn.
    AiActed { actor: usize, action: AiAction },
    /// The player command was accepted and the turn completed.
    PlayerActed { actor: usize },
    /// Battle over. `player_won` is "the player's team has a survivor".
    Ended { player_won: bool },
}

/// One decision from the player's battle menu.
///
/// Aim-style commands carry the cursor cell; the engine validates it against
/// the relevant stat-derived budget before anything is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Step to a cell marked reachable by the movement planner.
    Move { to: Position },
    /// Cast the known skill in `slot` with the cast anchor at `at`.
    Attack { slot: usize, at: Position },
    /// Pass the turn.
    Wait,
    /// Use an item from the shared bag on yourself.
    UseItem { item: crate::env::ItemId },
    /// Medicine treatment of the ally at `at`.
    Medicine { at: Position },
    /// Cure the poison of the ally at `at`.
    CurePoison { at: Position },
    /// Thaw the ally at `at`.
    Defrost { at: Position },
    /// Poison the enemy at `at`.
    UsePoison { at: Position },
    /// Hand this turn to the AI.
    Auto,
}

/// Battle engine: builds the field and roster from an encounter definition,
/// then resolves turns until one team is eliminated.
pub struct BattleEngine {
    config: BattleConfig,
    grid: BattlefieldGrid,
    roster: CombatantRoster,
    rewards: crate::encounter::EncounterRewards,
    phase: BattlePhase,
    player_won: bool,
}

impl BattleEngine {
    /// Builds a battle from its encounter definition.
    ///
    /// `field_payload` is the raw two-layer map blob from the resource
    /// collaborator; `None` or a malformed payload yields the all-passable
    /// default field. Speed and knowledge are snapshotted from the stat
    /// provider here so the scheduler never re-queries it mid-battle.
    pub fn new(
        definition: &EncounterDefinition,
        field_payload: Option<&[u8]>,
        env: &mut BattleEnv<'_>,
        config: BattleConfig,
    ) -> Self {
        let mut grid = match field_payload {
            Some(payload) => BattlefieldGrid::from_field_payload(payload),
            None => BattlefieldGrid::all_passable(),
        };
        let mut roster = CombatantRoster::new();

        let mut spawn = |entry: &crate::encounter::SpawnEntry, team: TeamId| {
            let stats = env.characters.stats(entry.character);
            let position = Position::new(entry.x as i32, entry.y as i32);
            let combatant = Combatant::new(entry.character, team, position)
                .with_stats(stats.speed as i16, stats.knowledge as i16)
                .with_auto(entry.auto);
            let index = roster.add(combatant);
            if grid.contains(position) {
                grid.set(Layer::Occupancy, position, index as i16);
            }
        };
        for entry in &definition.allies {
            spawn(entry, TeamId::PLAYER);
        }
        for entry in &definition.enemies {
            spawn(entry, TeamId(1));
        }

        Self {
            config,
            grid,
            roster,
            rewards: definition.rewards.clone(),
            phase: BattlePhase::Scheduling,
            player_won: false,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn grid(&self) -> &BattlefieldGrid {
        &self.grid
    }

    /// Direct grid access for harnesses and the scripting collaborator.
    pub fn grid_mut(&mut self) -> &mut BattlefieldGrid {
        &mut self.grid
    }

    pub fn roster(&self) -> &CombatantRoster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut CombatantRoster {
        &mut self.roster
    }

    /// Advances the state machine one step.
    ///
    /// Returns [`BattleSignal::PlayerPrompt`] without consuming anything
    /// when already suspended — callers may poll freely.
    pub fn tick(&mut self, env: &mut BattleEnv<'_>) -> BattleSignal {
        match self.phase {
            BattlePhase::Ended => {
                return BattleSignal::Ended {
                    player_won: self.player_won,
                };
            }
            BattlePhase::PlayerTurn(actor) => return BattleSignal::PlayerPrompt { actor },
            BattlePhase::Scheduling => {}
        }

        if let Some(signal) = self.check_end(env) {
            return signal;
        }

        let Some(actor) = self.roster.ready_actor() else {
            self.roster.advance_progress();
            return BattleSignal::Progressed;
        };

        // Turn setup: fresh action flag, then the poison meter bleeds.
        if let Some(combatant) = self.roster.get_mut(actor) {
            combatant.acted = false;
        }
        executor::poison_tick(&mut self.grid, &mut self.roster, env, actor);
        let Some(combatant) = self.roster.get(actor).filter(|c| c.is_alive()) else {
            // Poison finished the actor before it could move.
            return self.check_end(env).unwrap_or(BattleSignal::Progressed);
        };

        if combatant.team.is_player_side() && !combatant.auto {
            movement::plan_movement(&mut self.grid, &self.roster, actor);
            self.phase = BattlePhase::PlayerTurn(actor);
            return BattleSignal::PlayerPrompt { actor };
        }

        let action = ai::take_turn(
            &mut self.grid,
            &mut self.roster,
            env,
            actor,
            self.config.difficulty,
        );
        self.roster.apply_action_cost(actor, action.cost());
        if let Some(signal) = self.check_end(env) {
            return signal;
        }
        BattleSignal::AiActed { actor, action }
    }

    /// Feeds a player command into a suspended battle.
    ///
    /// Rejected commands leave the engine suspended on the same prompt; the
    /// caller may correct and retry. Accepted commands complete the turn and
    /// hand control back to scheduling.
    pub fn resume(
        &mut self,
        command: PlayerCommand,
        env: &mut BattleEnv<'_>,
    ) -> Result<BattleSignal, BattleError> {
        let actor = match self.phase {
            BattlePhase::PlayerTurn(actor) => actor,
            BattlePhase::Ended => return Err(BattleError::BattleOver),
            BattlePhase::Scheduling => return Err(BattleError::NotAwaitingInput),
        };

        let cost = match command {
            PlayerCommand::Move { to } => {
                if !movement::is_reachable(&self.grid, to) {
                    return Err(BattleError::OutOfReach(to));
                }
                executor::move_combatant(&mut self.grid, &mut self.roster, actor, to);
                ActionCost::Standard
            }

            PlayerCommand::Attack { slot, at } => {
                self.player_attack(env, actor, slot, at)?;
                ActionCost::Standard
            }

            PlayerCommand::Wait => ActionCost::Standard,

            PlayerCommand::UseItem { item } => {
                executor::use_item(&mut self.roster, env, actor, item, ItemSource::Bag)?;
                ActionCost::Support
            }

            PlayerCommand::Medicine { at } => {
                let target = self.aim(env, actor, at, |s| s.medicine / 15 + 1)?;
                executor::heal(&mut self.roster, env, actor, target)?;
                ActionCost::Support
            }

            PlayerCommand::CurePoison { at } => {
                let target = self.aim(env, actor, at, |s| s.cure_poison / 15 + 1)?;
                executor::cure_poison(&mut self.roster, env, actor, target)?;
                ActionCost::Support
            }

            PlayerCommand::Defrost { at } => {
                let target = self.aim(env, actor, at, |s| s.mp / 200 + 1)?;
                executor::defrost(&mut self.roster, env, actor, target)?;
                ActionCost::Support
            }

            PlayerCommand::UsePoison { at } => {
                let target = self.aim(env, actor, at, |s| s.use_poison / 15 + 1)?;
                executor::apply_poison(&mut self.roster, env, actor, target)?;
                ActionCost::Support
            }

            PlayerCommand::Auto => {
                let action = ai::take_turn(
                    &mut self.grid,
                    &mut self.roster,
                    env,
                    actor,
                    self.config.difficulty,
                );
                let cost = action.cost();
                self.roster.apply_action_cost(actor, cost);
                self.phase = BattlePhase::Scheduling;
                return Ok(self
                    .check_end(env)
                    .unwrap_or(BattleSignal::AiActed { actor, action }));
            }
        };

        self.roster.apply_action_cost(actor, cost);
        self.phase = BattlePhase::Scheduling;
        Ok(self
            .check_end(env)
            .unwrap_or(BattleSignal::PlayerActed { actor }))
    }

    /// Skill attack from the player menu. An empty or unresolvable skill
    /// slot degrades to a plain adjacent strike, mirroring the AI fallback.
    fn player_attack(
        &mut self,
        env: &mut BattleEnv<'_>,
        actor: usize,
        slot: usize,
        at: Position,
    ) -> Result<(), BattleError> {
        let combatant = self
            .roster
            .get(actor)
            .ok_or(BattleError::NoSuchCombatant(actor))?;
        let origin = combatant.position;
        let character = combatant.character;

        let known = env.characters.known_skills(character);
        let skill = known
            .get(slot)
            .and_then(|k| env.skills.skill(k.skill).map(|data| (data, k.level())));

        match skill {
            Some((data, level)) => {
                if origin.manhattan(at) > data.step_at(level) {
                    return Err(BattleError::OutOfReach(at));
                }
                executor::attack_with_skill(
                    &mut self.grid,
                    &mut self.roster,
                    env,
                    actor,
                    &data,
                    level,
                    at,
                    self.config.difficulty,
                );
                Ok(())
            }
            None => {
                if origin.manhattan(at) > 1 {
                    return Err(BattleError::OutOfReach(at));
                }
                let target = self
                    .grid
                    .occupant(at)
                    .ok_or(BattleError::NoTargetAt(at))?;
                executor::flat_strike(&mut self.grid, &mut self.roster, env, actor, target)?;
                Ok(())
            }
        }
    }

    /// Validates an aim-selection cell against a stat-derived Manhattan
    /// budget and resolves its occupant.
    fn aim(
        &self,
        env: &mut BattleEnv<'_>,
        actor: usize,
        at: Position,
        budget: impl Fn(&crate::env::CombatStats) -> i32,
    ) -> Result<usize, BattleError> {
        let combatant = self
            .roster
            .get(actor)
            .ok_or(BattleError::NoSuchCombatant(actor))?;
        let stats = env.characters.stats(combatant.character);
        if combatant.position.manhattan(at) > budget(&stats) {
            return Err(BattleError::OutOfReach(at));
        }
        self.grid.occupant(at).ok_or(BattleError::NoTargetAt(at))
    }

    /// Termination check; on the transition to `Ended` the battle result is
    /// fixed and experience/rewards are written back through the provider.
    fn check_end(&mut self, env: &mut BattleEnv<'_>) -> Option<BattleSignal> {
        if self.phase == BattlePhase::Ended {
            return Some(BattleSignal::Ended {
                player_won: self.player_won,
            });
        }
        if !self.roster.one_side_left() {
            return None;
        }

        self.player_won = self.roster.team_alive(TeamId::PLAYER);
        self.phase = BattlePhase::Ended;

        // Battle experience accrues to the player's side only; enemy records
        // do not persist.
        for index in 0..self.roster.count() {
            let Some(combatant) = self.roster.get(index) else {
                continue;
            };
            if combatant.team.is_player_side() && combatant.exp_gained > 0 {
                env.characters
                    .add_experience(combatant.character, combatant.exp_gained);
            }
        }

        if self.player_won {
            for index in 0..self.roster.count() {
                let Some(combatant) = self.roster.get(index) else {
                    continue;
                };
                if combatant.team.is_player_side() && combatant.is_alive() {
                    env.characters
                        .add_experience(combatant.character, self.rewards.experience);
                }
            }
            for grant in &self.rewards.items {
                env.characters.grant_bag(grant.item, grant.count as u32);
            }
            if self.rewards.money != 0 {
                env.characters.add_money(self.rewards.money);
            }
        }

        Some(BattleSignal::Ended {
            player_won: self.player_won,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::{EncounterDefinition, ItemGrant, SpawnEntry};
    use crate::env::{CombatStats, ItemId, PcgRng, StatProvider};
    use crate::testutil::FixtureWorld;

    fn fighter(hp: i32, attack: i32, speed: i32) -> CombatStats {
        CombatStats {
            level: 5,
            attack,
            defense: 0,
            speed,
            hp,
            max_hp: hp,
            mp: 100,
            max_mp: 100,
            phy_power: 100,
            ..Default::default()
        }
    }

    fn duel(world: &mut FixtureWorld, ally_auto: bool) -> EncounterDefinition {
        let hero = world.add_character(fighter(300, 60, 50));
        let bandit = world.add_character(fighter(150, 40, 40));
        let mut definition = EncounterDefinition::new("duel", 0);
        let mut ally = SpawnEntry::new(hero, 5, 5);
        if ally_auto {
            ally = ally.auto();
        }
        definition.allies.push(ally);
        definition.enemies.push(SpawnEntry::new(bandit, 8, 5));
        definition
    }

    #[test]
    fn setup_places_occupancy_for_every_spawn() {
        let mut world = FixtureWorld::new();
        let definition = duel(&mut world, false);
        let mut rng = PcgRng::seeded(1);
        let skills = FixtureWorld::new();
        let items = FixtureWorld::new();
        let mut env = BattleEnv::new(&mut world, &skills, &items, &mut rng);
        let engine = BattleEngine::new(&definition, None, &mut env, BattleConfig::default());

        assert_eq!(engine.roster().count(), 2);
        assert_eq!(engine.grid().occupant(Position::new(5, 5)), Some(0));
        assert_eq!(engine.grid().occupant(Position::new(8, 5)), Some(1));
        // Speed snapshot came from the provider.
        assert_eq!(engine.roster().get(0).unwrap().speed, 50);
    }

    #[test]
    fn auto_battle_terminates_with_a_winner() {
        let mut world = FixtureWorld::new();
        let definition = duel(&mut world, true);
        let mut rng = PcgRng::seeded(9);
        let skills = FixtureWorld::new();
        let items = FixtureWorld::new();
        let mut env = BattleEnv::new(&mut world, &skills, &items, &mut rng);
        let mut engine = BattleEngine::new(&definition, None, &mut env, BattleConfig::default());

        for _ in 0..10_000 {
            if let BattleSignal::Ended { player_won } = engine.tick(&mut env) {
                // Hero hits for 60 vs 150 HP; bandit hits for 40 vs 300 HP.
                assert!(player_won);
                return;
            }
        }
        panic!("battle did not terminate");
    }

    #[test]
    fn player_prompt_suspends_until_resume() {
        let mut world = FixtureWorld::new();
        let definition = duel(&mut world, false);
        let mut rng = PcgRng::seeded(2);
        let skills = FixtureWorld::new();
        let items = FixtureWorld::new();
        let mut env = BattleEnv::new(&mut world, &skills, &items, &mut rng);
        let mut engine = BattleEngine::new(&definition, None, &mut env, BattleConfig::default());

        let prompt = loop {
            match engine.tick(&mut env) {
                BattleSignal::PlayerPrompt { actor } => break actor,
                BattleSignal::Progressed | BattleSignal::AiActed { .. } => continue,
                other => panic!("unexpected signal {other:?}"),
            }
        };
        assert_eq!(prompt, 0);
        // Polling again re-issues the same prompt.
        assert_eq!(engine.tick(&mut env), BattleSignal::PlayerPrompt { actor: 0 });

        // An unreachable destination is rejected and the prompt survives.
        let err = engine
            .resume(
                PlayerCommand::Move {
                    to: Position::new(40, 40),
                },
                &mut env,
            )
            .unwrap_err();
        assert!(matches!(err, BattleError::OutOfReach(_)));
        assert_eq!(engine.phase(), BattlePhase::PlayerTurn(0));

        // A marked cell is accepted and the turn completes.
        let signal = engine
            .resume(
                PlayerCommand::Move {
                    to: Position::new(6, 5),
                },
                &mut env,
            )
            .unwrap();
        assert_eq!(signal, BattleSignal::PlayerActed { actor: 0 });
        assert_eq!(engine.phase(), BattlePhase::Scheduling);
        assert_eq!(engine.roster().get(0).unwrap().progress, 0);
    }

    #[test]
    fn wait_outside_player_turn_is_rejected() {
        let mut world = FixtureWorld::new();
        let definition = duel(&mut world, false);
        let mut rng = PcgRng::seeded(2);
        let skills = FixtureWorld::new();
        let items = FixtureWorld::new();
        let mut env = BattleEnv::new(&mut world, &skills, &items, &mut rng);
        let mut engine = BattleEngine::new(&definition, None, &mut env, BattleConfig::default());
        assert_eq!(
            engine.resume(PlayerCommand::Wait, &mut env),
            Err(BattleError::NotAwaitingInput)
        );
    }

    #[test]
    fn killing_blow_ends_battle_and_pays_out() {
        let mut world = FixtureWorld::new();
        let hero = world.add_character(fighter(300, 500, 90));
        let bandit = world.add_character(fighter(100, 10, 10));
        let loot = ItemId(11);

        let mut definition = EncounterDefinition::new("payout", 0);
        definition.allies.push(SpawnEntry::new(hero, 5, 5));
        definition.enemies.push(SpawnEntry::new(bandit, 6, 5));
        definition.rewards.experience = 500;
        definition.rewards.money = 1000;
        definition.rewards.items.push(ItemGrant {
            item: loot,
            count: 2,
        });

        let mut rng = PcgRng::seeded(4);
        let skills = FixtureWorld::new();
        let items = FixtureWorld::new();
        let mut env = BattleEnv::new(&mut world, &skills, &items, &mut rng);
        let mut engine = BattleEngine::new(&definition, None, &mut env, BattleConfig::default());

        loop {
            match engine.tick(&mut env) {
                BattleSignal::PlayerPrompt { .. } => break,
                BattleSignal::Progressed => continue,
                other => panic!("unexpected {other:?}"),
            }
        }

        // Bare-handed strike: 500 attack flattens 100 HP.
        let signal = engine
            .resume(
                PlayerCommand::Attack {
                    slot: 0,
                    at: Position::new(6, 5),
                },
                &mut env,
            )
            .unwrap();
        assert_eq!(signal, BattleSignal::Ended { player_won: true });

        // Kill credit (level 5 × 10) plus the reward experience.
        assert_eq!(env.characters.stats(hero).hp, 300);
        drop(env);
        assert_eq!(world.experience(hero), 50 + 500);
        assert_eq!(world.money, 1000);
        assert_eq!(world.bag_items(), vec![(loot, 2)]);
    }

    #[test]
    fn aim_budget_gates_medicine() {
        let mut world = FixtureWorld::new();
        let healer = world.add_character(CombatStats {
            medicine: 30, // budget 3
            ..fighter(200, 10, 80)
        });
        let patient = world.add_character(fighter(100, 10, 10));
        let bandit = world.add_character(fighter(100, 10, 5));

        let mut definition = EncounterDefinition::new("clinic", 0);
        definition.allies.push(SpawnEntry::new(healer, 5, 5));
        definition.allies.push(SpawnEntry::new(patient, 10, 5));
        definition.enemies.push(SpawnEntry::new(bandit, 20, 20));

        let mut rng = PcgRng::seeded(6);
        let skills = FixtureWorld::new();
        let items = FixtureWorld::new();
        let mut env = BattleEnv::new(&mut world, &skills, &items, &mut rng);
        let mut engine = BattleEngine::new(&definition, None, &mut env, BattleConfig::default());

        loop {
            match engine.tick(&mut env) {
                BattleSignal::PlayerPrompt { actor } => {
                    assert_eq!(actor, 0);
                    break;
                }
                BattleSignal::Progressed | BattleSignal::AiActed { .. } => continue,
                other => panic!("unexpected {other:?}"),
            }
        }

        // Patient sits 5 cells away, budget is 3.
        let err = engine
            .resume(
                PlayerCommand::Medicine {
                    at: Position::new(10, 5),
                },
                &mut env,
            )
            .unwrap_err();
        assert!(matches!(err, BattleError::OutOfReach(_)));

        // Self-treatment is always in budget; support cost applies.
        let signal = engine
            .resume(
                PlayerCommand::Medicine {
                    at: Position::new(5, 5),
                },
                &mut env,
            )
            .unwrap();
        assert_eq!(signal, BattleSignal::PlayerActed { actor: 0 });
        assert!(engine.roster().get(0).unwrap().progress <= -100);
    }
}
