use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend process error: {0}")]
    Process(String),

    #[error("Backend did not become ready within {}", humantime::format_duration(*.0))]
    BackendUnavailable(Duration),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Backend rejected request ({code}): {message}")]
    Backend { code: i64, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Decode(err.to_string())
    }
}
