use core::fmt;

/// Identifier of an item record in the external item table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u16);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// The slice of an item definition the battle cares about.
///
/// Restores apply when the item is consumed; `poison` doubles as the potency
/// of a thrown hidden weapon (positive poisons the target) and as a cure
/// when negative on a consumable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemEffects {
    pub restore_hp: i16,
    pub restore_mp: i16,
    pub restore_stamina: i16,
    pub poison: i16,
}

/// Read access to the external item table.
pub trait ItemOracle: Send + Sync {
    /// Returns the battle-relevant effects of an item, or `None` for an
    /// unknown id.
    fn battle_effects(&self, id: ItemId) -> Option<ItemEffects>;
}
