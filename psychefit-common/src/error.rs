//! Common error types for PsycheFit

use crate::model::AttachmentType;
use thiserror::Error;

/// Common result type for PsycheFit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across PsycheFit crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Question bank or detail table could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid data or user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not allowed in the current quiz stage
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Strict scoring refused an answer set with gaps
    #[error("Incomplete answers: questions {0:?} have no valid answer")]
    IncompleteAnswers(Vec<usize>),

    /// Detail table has no entry for a computed type
    #[error("No detail entry for attachment type '{0}'")]
    MissingDetail(AttachmentType),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
