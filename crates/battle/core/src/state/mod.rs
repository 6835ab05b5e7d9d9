//! Battle-local state: the layered field grid and the combatant roster.
//!
//! Everything here is owned by the engine for exactly one battle. Persistent
//! character data stays behind [`crate::env::StatProvider`]; these types only
//! hold what the battle itself needs to schedule turns and track the field.

mod common;
mod grid;
mod roster;

pub use common::{CharacterId, Facing, Position, TeamId};
pub use grid::{BattlefieldGrid, Layer};
pub use roster::{ActionCost, Combatant, CombatantRoster};
