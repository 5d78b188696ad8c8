//! Error types for the tutorial session and preview compositor.

use thiserror::Error;

/// Result type alias for mentor operations.
pub type MentorResult<T> = Result<T, MentorError>;

/// Errors that can occur while driving a tutorial or composing a preview.
#[derive(Error, Debug)]
pub enum MentorError {
    /// Neither a description nor any image was supplied.
    #[error("A description or at least one image is required")]
    EmptyInput,

    /// The session already holds tutorial steps.
    #[error("Tutorial session already started")]
    AlreadyStarted,

    /// No tutorial step exists yet.
    #[error("Tutorial session not started")]
    NotStarted,

    /// A completion request is already in flight for this session.
    #[error("A completion request is already in flight")]
    RequestInFlight,

    /// A reply arrived but no request was pending.
    #[error("No completion request is pending")]
    NoRequestPending,

    /// The completion response carried no usable choice.
    #[error("Completion response contained no choices")]
    EmptyCompletion,

    /// Index out of bounds for list operations.
    #[error("Index {index} out of bounds for list of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// The completion API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure reaching the completion API.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// Credential storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MentorError {
    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length }
    }

    /// Creates an Api error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an Http error.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a Storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<serde_json::Error> for MentorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for MentorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for MentorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
