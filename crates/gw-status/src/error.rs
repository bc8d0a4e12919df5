//! Error types for the status engine.

/// Errors that can occur while configuring the engine.
///
/// Classification itself is total over [`gw_types::RepoStatus`]; these
/// errors only arise from bad configuration.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// The classifier configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for status engine results.
pub type StatusResult<T> = Result<T, StatusError>;
