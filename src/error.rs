//! Error types shared by the grid engine and the layers around it.

use thiserror::Error;

/// Main error type for meetgrid
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid time range: {start} must be before {end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("Invalid time value: {0}")]
    InvalidTime(String),

    #[error("Slot key does not resolve against this grid: {0}")]
    KeyResolution(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type alias for meetgrid operations
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    /// Whether the error was caused by bad caller input rather than the environment
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GridError::InvalidTimeRange { .. }
                | GridError::InvalidTime(_)
                | GridError::KeyResolution(_)
                | GridError::InvalidEvent(_)
        )
    }
}
