use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;

/// Error type shared by every operation in this crate.
///
/// Driver-native errors are carried transparently so callers see the same
/// error value the blocking path would have produced.
#[derive(Debug, Error)]
pub enum SqlBridgeError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    /// Installation-time problem: a requested mirror operation is not
    /// declared by the target model, or options are invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A call could not even begin: the session or worker pool is closed,
    /// or the statement failed pre-submission validation. Always raised
    /// synchronously, never through a bridged future.
    #[error("Submission error: {0}")]
    SubmissionError(String),

    /// The driver thread or a completion producer went away.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Execution faults that have no driver-native error value.
    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    /// The model declares this operation as unavailable.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}
