use thiserror::Error;

use crate::state::SessionState;

/// The status query's terminal result was an error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("status query failed: {diagnostic}")]
pub struct QueryFailure {
    pub diagnostic: String,
}

impl QueryFailure {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }
}

/// A commit, push or update command failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{action} failed: {diagnostic}")]
pub struct ExecutionFailure {
    pub action: String,
    pub diagnostic: String,
}

impl ExecutionFailure {
    pub fn new(action: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            diagnostic: diagnostic.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    QueryFailed(#[from] QueryFailure),

    #[error(transparent)]
    Execution(#[from] ExecutionFailure),

    #[error("invalid session state: expected {expected}, found {actual}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    #[error("{action} is not available in the current view")]
    Unavailable { action: &'static str },

    #[error("background task failed: {0}")]
    TaskFailed(String),

    #[error("status engine error: {0}")]
    Status(#[from] gw_status::StatusError),
}

pub type SessionResult<T> = Result<T, SessionError>;
