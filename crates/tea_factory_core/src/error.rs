//! Error type shared by every core operation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Network failure or non-success status on a read.
    #[error("Fetch failed for {what}: {message}")]
    Fetch { what: String, message: String },

    /// Non-success status on a create/update/delete.
    #[error("{message}")]
    Write { status: u16, message: String },

    /// Rejected before any network call.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

impl CoreError {
    pub fn fetch(what: impl Into<String>, message: impl ToString) -> Self {
        CoreError::Fetch {
            what: what.into(),
            message: message.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Decode(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CoreError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CoreError::Channel(e.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
