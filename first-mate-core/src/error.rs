//! Error types for first-mate.

use thiserror::Error;

/// Errors that can occur in first-mate operations.
#[derive(Error, Debug)]
pub enum FirstMateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User '{0}' is already registered")]
    UserExists(String),

    #[error("Invalid zID '{0}'. Expected a 'z' followed by 7 digits")]
    InvalidZid(String),

    #[error("Unknown degree: {0}")]
    UnknownDegree(String),

    #[error("Cannot like your own profile")]
    SelfLike,

    #[error("Invalid calendar URL '{0}': {1}")]
    InvalidFeedUrl(String, String),

    #[error("Failed to download calendar: {0}")]
    Download(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Invalid date range: {0}")]
    DateRange(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for first-mate operations.
pub type FirstMateResult<T> = Result<T, FirstMateError>;
