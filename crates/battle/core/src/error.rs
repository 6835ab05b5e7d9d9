use crate::state::Position;

/// Errors surfaced when resuming the battle state machine with a player
/// command. These are recoverable: the engine stays suspended on the same
/// prompt and the caller may submit a corrected command.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("battle is not waiting for player input")]
    NotAwaitingInput,

    #[error("no combatant at roster index {0}")]
    NoSuchCombatant(usize),

    #[error("cell {0} is outside the acting combatant's reach")]
    OutOfReach(Position),

    #[error("cell {0} holds no valid target")]
    NoTargetAt(Position),

    #[error("target at {0} is on the wrong team for this action")]
    WrongTeam(Position),

    #[error("no usable item of the requested kind")]
    NoUsableItem,

    #[error("battle already ended")]
    BattleOver,
}
