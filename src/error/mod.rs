//! Crate-level error type

use thiserror::Error;

use crate::domain::errors::{CaptureError, DomainError};

/// Main error type for violet-trim operations
#[derive(Error, Debug)]
pub enum TrimError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Invalid time value on the command line
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// The surface could not report a usable duration
    #[error("No duration available for {name}")]
    UnknownDuration { name: String },

    /// Trim finished without producing an output clip
    #[error("Trim failed: {message}")]
    TrimFailed { message: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Thumbnail capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for violet-trim operations
pub type TrimResult<T> = std::result::Result<T, TrimError>;
