//! Encounter definitions: the static input a battle is built from.
//!
//! Owned by the caller (usually loaded by `battle-content` from table
//! files) and consumed once by battle setup. Field geometry arrives
//! separately as a raw map payload — see
//! [`BattlefieldGrid::from_field_payload`](crate::state::BattlefieldGrid::from_field_payload)
//! for the size-mismatch fallback rule.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::env::ItemId;
use crate::state::CharacterId;

/// One combatant to place at battle start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnEntry {
    pub character: CharacterId,
    pub x: i16,
    pub y: i16,
    /// Allies flagged auto fight under AI control even though they are on
    /// the player's team.
    #[cfg_attr(feature = "serde", serde(default))]
    pub auto: bool,
}

impl SpawnEntry {
    pub fn new(character: CharacterId, x: i16, y: i16) -> Self {
        Self {
            character,
            x,
            y,
            auto: false,
        }
    }

    pub fn auto(mut self) -> Self {
        self.auto = true;
        self
    }
}

/// An item stack granted when the battle is won.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemGrant {
    pub item: ItemId,
    pub count: u16,
}

/// Spoils awarded to the player's side on victory.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterRewards {
    pub experience: i32,
    pub items: ArrayVec<ItemGrant, { BattleConfig::MAX_REWARD_ITEMS }>,
    pub money: i32,
}

/// Static description of one battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterDefinition {
    pub name: String,
    /// Battlefield map id, resolved to a field payload by the resource
    /// collaborator.
    pub map: u16,
    /// Battle music id; passed through to the presentation layer.
    pub music: i16,
    pub allies: ArrayVec<SpawnEntry, { BattleConfig::MAX_ALLIES }>,
    pub enemies: ArrayVec<SpawnEntry, { BattleConfig::MAX_ENEMIES }>,
    pub rewards: EncounterRewards,
}

impl EncounterDefinition {
    pub fn new(name: impl Into<String>, map: u16) -> Self {
        Self {
            name: name.into(),
            map,
            music: -1,
            allies: ArrayVec::new(),
            enemies: ArrayVec::new(),
            rewards: EncounterRewards::default(),
        }
    }
}
