use arrayvec::ArrayVec;

use super::{ItemId, SkillId, WeaponCategory};
use crate::config::BattleConfig;
use crate::state::CharacterId;

/// Derived combat stats for one character, aggregated by the external store
/// (base values plus equipment and cultivation-technique bonuses). The
/// engine reads this snapshot; it never re-derives the layering itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub level: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,

    // Weapon proficiencies, one per category.
    pub unarmed: i32,
    pub sword: i32,
    pub blade: i32,
    pub exotic: i32,

    // Support disciplines.
    pub medicine: i32,
    pub use_poison: i32,
    pub cure_poison: i32,
    pub resist_poison: i32,
    pub hidden_weapon: i32,

    /// Combat-tactics stat feeding the team knowledge differential.
    pub knowledge: i32,

    // Resources.
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    /// Stamina on a 0–100 scale.
    pub phy_power: i32,
    /// Accumulated injury, dampens received healing.
    pub injury: i32,
    /// Poison meter on a 0–100 scale.
    pub poison: i32,

    /// True when the character wears a complete matching equipment set.
    pub matching_set: bool,
}

impl CombatStats {
    pub fn proficiency(&self, category: WeaponCategory) -> i32 {
        match category {
            WeaponCategory::Unarmed => self.unarmed,
            WeaponCategory::Sword => self.sword,
            WeaponCategory::Blade => self.blade,
            WeaponCategory::Exotic => self.exotic,
        }
    }
}

/// A skill a character has learned, with its raw mastery points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnownSkill {
    pub skill: SkillId,
    /// Raw mastery points; 100 points per level.
    pub mastery: i32,
}

impl KnownSkill {
    /// Mastery level derived from raw points, clamped to 1–10.
    pub fn level(&self) -> i32 {
        (self.mastery / 100).clamp(1, 10)
    }
}

/// An item stack in a character's carried slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarriedItem {
    pub item: ItemId,
    pub count: u16,
}

/// View into the persistent character store.
///
/// Reads return aggregated snapshots; writes apply immediately so an
/// interrupted battle leaves the external state consistent with every action
/// that completed. The engine clamps values before writing — providers store
/// what they are given.
pub trait StatProvider: Send + Sync {
    fn stats(&self, id: CharacterId) -> CombatStats;

    fn known_skills(&self, id: CharacterId) -> ArrayVec<KnownSkill, { BattleConfig::MAX_SKILLS }>;

    fn carried_items(&self, id: CharacterId)
    -> ArrayVec<CarriedItem, { BattleConfig::MAX_CARRIED }>;

    // ========================================================================
    // Write-back, applied per resolved action
    // ========================================================================

    fn set_hp(&mut self, id: CharacterId, value: i32);
    fn set_mp(&mut self, id: CharacterId, value: i32);
    fn set_phy_power(&mut self, id: CharacterId, value: i32);
    fn set_injury(&mut self, id: CharacterId, value: i32);
    fn set_poison(&mut self, id: CharacterId, value: i32);
    fn add_experience(&mut self, id: CharacterId, amount: i32);

    /// Removes one unit of `item` from the character's carried slots.
    fn consume_carried(&mut self, id: CharacterId, item: ItemId);

    // ========================================================================
    // Shared party bag
    // ========================================================================

    /// Item stacks currently in the shared bag.
    fn bag_items(&self) -> Vec<(ItemId, u32)>;

    /// Removes one unit of `item` from the shared bag.
    fn consume_bag(&mut self, item: ItemId);

    /// Grants a reward item stack to the bag (battle spoils).
    fn grant_bag(&mut self, item: ItemId, count: u32);

    /// Adds currency to the party purse (battle spoils).
    fn add_money(&mut self, amount: i32);
}
