use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown repository status: {0}")]
    UnknownStatus(String),

    #[error("unknown perspective: {0}")]
    UnknownPerspective(String),

    #[error("invalid path in status record: {0}")]
    InvalidPath(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for type-level results.
pub type TypeResult<T> = Result<T, TypeError>;
