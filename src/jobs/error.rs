//! Error type for the scheduled jobs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for job operations
pub type JobResult<T> = Result<T, JobError>;

/// Everything that can go wrong while a job talks to the API or writes its log
#[derive(Debug, Error)]
pub enum JobError {
    /// The request never got a response
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("GraphQL endpoint returned HTTP {0}")]
    Status(u16),

    /// The response carried GraphQL errors
    #[error("GraphQL error: {0}")]
    GraphQL(String),

    /// The response had neither data nor errors
    #[error("GraphQL response contained no data")]
    MissingData,

    /// The reminder window reaches outside the representable calendar
    #[error("Reminder window of {0} days is out of range")]
    WindowOutOfRange(i64),

    /// A mutation ran but reported failure
    #[error("{0}")]
    Rejected(String),

    /// The log file could not be written
    #[error("Failed to write log file {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
