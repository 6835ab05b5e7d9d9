//! Traits describing the battle's external collaborators.
//!
//! The engine never owns persistent data: character stats live in the stat
//! provider, skill and item definitions come from oracles, and randomness is
//! injected. [`BattleEnv`] bundles them so engine entry points take one
//! argument instead of four and tests can swap any piece independently.

mod items;
mod rng;
mod skills;
mod stats;

pub use items::{ItemEffects, ItemId, ItemOracle};
pub use rng::{BattleRng, PcgRng, mix_seed};
pub use skills::{HurtKind, SkillData, SkillId, SkillOracle, WeaponCategory};
pub use stats::{CarriedItem, CombatStats, KnownSkill, StatProvider};

/// Aggregates the external collaborators for one battle.
///
/// The stat provider and RNG are mutable (damage is written back
/// immediately; dice advance the stream); the definition oracles are
/// read-only.
pub struct BattleEnv<'a> {
    pub characters: &'a mut dyn StatProvider,
    pub skills: &'a dyn SkillOracle,
    pub items: &'a dyn ItemOracle,
    pub rng: &'a mut dyn BattleRng,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        characters: &'a mut dyn StatProvider,
        skills: &'a dyn SkillOracle,
        items: &'a dyn ItemOracle,
        rng: &'a mut dyn BattleRng,
    ) -> Self {
        Self {
            characters,
            skills,
            items,
            rng,
        }
    }
}
