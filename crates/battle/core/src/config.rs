/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Difficulty scaling applied to non-player teams in the knowledge
    /// differential (see `damage::knowledge_diff`).
    pub difficulty: i32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Battlefield edge length in cells. The field is always square.
    pub const FIELD_SIZE: usize = 64;
    /// Number of cell layers (terrain, obstacle, occupancy, marks, reserved).
    pub const FIELD_LAYERS: usize = 8;
    /// Maximum ally spawn entries in an encounter definition.
    pub const MAX_ALLIES: usize = 12;
    /// Maximum enemy spawn entries in an encounter definition.
    pub const MAX_ENEMIES: usize = 30;
    /// Known-skill slots per character.
    pub const MAX_SKILLS: usize = 10;
    /// Carried-item slots per character.
    pub const MAX_CARRIED: usize = 4;
    /// Item grants in an encounter reward block.
    pub const MAX_REWARD_ITEMS: usize = 3;

    // ===== scheduling =====
    /// Initiative meter value at which a combatant becomes ready to act.
    pub const READY_PROGRESS: i32 = 100;
    /// Progress penalty subtracted after a support action (heal, cure,
    /// poison, hidden weapon, item use). Larger than the ready threshold,
    /// so the meter can go negative.
    pub const SUPPORT_ACTION_COST: i32 = 240;
    /// Physical power deducted from the actor of a support action.
    pub const SUPPORT_PHY_COST: i32 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DIFFICULTY: i32 = 50;

    pub fn new() -> Self {
        Self {
            difficulty: Self::DEFAULT_DIFFICULTY,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
