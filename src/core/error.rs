use crate::plugins::expr::ExprError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Malformed data file: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    ExpressionError(#[from] ExprError),
    #[error("No internet connection: {0}")]
    ServiceUnavailable(String),
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Weather service returned HTTP {0}")]
    HttpStatus(u16),
    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

impl DeskError {
    /// Errors the operator can fix by re-running the command with other input.
    /// Everything else (storage, config) has no recovery path.
    pub fn is_operator_error(&self) -> bool {
        matches!(
            self,
            DeskError::ValidationError(_)
                | DeskError::NotFound(_)
                | DeskError::ExpressionError(_)
                | DeskError::ServiceUnavailable(_)
                | DeskError::CityNotFound(_)
                | DeskError::HttpStatus(_)
                | DeskError::MalformedResponse(_)
        )
    }
}
