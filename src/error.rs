//! ShadowCoach Error Types
//!
//! Centralized error handling for the practice-session layer. The assessment
//! core itself is total over well-typed input and never surfaces errors here.

use thiserror::Error;

/// Central error type for ShadowCoach
#[derive(Error, Debug)]
pub enum ShadowError {
    #[error("Recognizer engine error: {0}")]
    Recognizer(String),

    #[error("Recording error: {0}")]
    Recording(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ShadowCoach operations
pub type ShadowResult<T> = Result<T, ShadowError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for ShadowError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        ShadowError::Lock(err.to_string())
    }
}
