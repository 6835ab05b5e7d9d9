/// Runner errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RunnerError {
    #[error("no encounter with id {0}")]
    UnknownEncounter(usize),

    #[error("content loading failed: {0}")]
    ContentError(String),

    #[error("decision provider failed: {0}")]
    ProviderFailed(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
