//! Deterministic tactical battle resolution.
//!
//! `battle-core` turns a static [`EncounterDefinition`] into a live grid
//! battle: initiative scheduling, BFS movement, area templates, the blended
//! damage formula, and a priority-driven AI, all orchestrated by
//! [`BattleEngine`]. The crate performs no I/O — persistent characters,
//! skill/item tables, and randomness arrive through the [`env`] traits, and
//! player input enters through the suspend/resume surface on the engine.

pub mod ai;
pub mod config;
pub mod damage;
pub mod encounter;
pub mod engine;
pub mod env;
pub mod error;
pub mod executor;
pub mod movement;
pub mod state;
pub mod targeting;

#[cfg(test)]
pub(crate) mod testutil;

pub use ai::AiAction;
pub use config::BattleConfig;
pub use encounter::{EncounterDefinition, EncounterRewards, ItemGrant, SpawnEntry};
pub use engine::{BattleEngine, BattlePhase, BattleSignal, PlayerCommand};
pub use env::{
    BattleEnv, BattleRng, CarriedItem, CombatStats, HurtKind, ItemEffects, ItemId, ItemOracle,
    KnownSkill, PcgRng, SkillData, SkillId, SkillOracle, StatProvider, WeaponCategory, mix_seed,
};
pub use error::BattleError;
pub use executor::{Hit, ItemSource, RestoreKind};
pub use state::{
    ActionCost, BattlefieldGrid, CharacterId, Combatant, CombatantRoster, Facing, Layer, Position,
    TeamId,
};
