// Domain errors - Error types for the domain layer

use std::fmt;
use std::time::Duration;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Range mutation would break `0 <= start < end <= duration`
    InvalidRange(String),
    /// Operation attempted before its preconditions were met
    NotReady(String),
    /// Transcode engine failed to load or run
    EngineFail(String),
    /// Playback surface failed to load, seek or snapshot
    SurfaceFail(String),
    /// Filesystem error
    FsFail(String),
    /// Configuration error
    ConfigFail(String),
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::InvalidRange(msg) => write!(f, "Invalid range: {}", msg),
            DomainError::NotReady(msg) => write!(f, "Not ready: {}", msg),
            DomainError::EngineFail(msg) => write!(f, "Engine failure: {}", msg),
            DomainError::SurfaceFail(msg) => write!(f, "Surface failure: {}", msg),
            DomainError::FsFail(msg) => write!(f, "Filesystem error: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// Thumbnail capture failures
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// The surface never reported seek completion
    SeekTimeout {
        index: usize,
        timestamp: f64,
        timeout: Duration,
    },
    /// The surface rejected the seek
    SeekFailed {
        index: usize,
        timestamp: f64,
        source: DomainError,
    },
    /// The current frame could not be rasterised
    SnapshotFailed { index: usize, source: DomainError },
}

impl CaptureError {
    /// Index of the thumbnail that was being captured
    pub fn index(&self) -> usize {
        match self {
            CaptureError::SeekTimeout { index, .. }
            | CaptureError::SeekFailed { index, .. }
            | CaptureError::SnapshotFailed { index, .. } => *index,
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::SeekTimeout {
                index,
                timestamp,
                timeout,
            } => write!(
                f,
                "Seek to {:.3}s (thumbnail {}) did not complete within {} ms",
                timestamp,
                index,
                timeout.as_millis()
            ),
            CaptureError::SeekFailed {
                index,
                timestamp,
                source,
            } => write!(
                f,
                "Seek to {:.3}s (thumbnail {}) failed: {}",
                timestamp, index, source
            ),
            CaptureError::SnapshotFailed { index, source } => {
                write!(f, "Snapshot of thumbnail {} failed: {}", index, source)
            }
        }
    }
}

impl std::error::Error for CaptureError {}
