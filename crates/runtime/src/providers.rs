//! Asynchronous abstraction for sourcing player battle decisions.
//!
//! Runner users plug in [`PlayerDecisionProvider`] implementations so a
//! battle can run with human input, scripted fixtures, or full delegation
//! to the in-engine AI.

use async_trait::async_trait;
use battle_core::{BattleEngine, PlayerCommand};

use crate::error::Result;

/// Trait for answering a suspended battle's player prompt.
///
/// Different implementations can handle:
/// - Human input (from UI/CLI)
/// - Scripted/replayed commands
/// - Testing fixtures
#[async_trait]
pub trait PlayerDecisionProvider: Send + Sync {
    /// Decide what the prompted combatant does.
    ///
    /// # Arguments
    /// * `actor` - Roster index of the combatant awaiting orders
    /// * `engine` - Read-only view of the battle (grid marks, roster)
    ///
    /// # Returns
    /// The command to submit, or an error if no decision can be made.
    async fn decide(&self, actor: usize, engine: &BattleEngine) -> Result<PlayerCommand>;
}

/// A provider that hands every turn to the engine's AI.
/// Useful for testing or as a fallback.
pub struct AutoPilot;

#[async_trait]
impl PlayerDecisionProvider for AutoPilot {
    async fn decide(&self, _actor: usize, _engine: &BattleEngine) -> Result<PlayerCommand> {
        Ok(PlayerCommand::Auto)
    }
}
