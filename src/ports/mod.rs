// Ports - Interface definitions (contracts)

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the playback surface the sampler drives
///
/// Exposes one current frame at a time, so callers must serialise seeks.
#[async_trait]
pub trait MediaSurfacePort: Send + Sync {
    /// Load a new source and resolve once its metadata (duration) is known.
    /// `None` means the surface could not determine a duration.
    async fn attach(&self, source: &SourceClip) -> Result<Option<f64>, DomainError>;

    /// Move the playback position; resolves when the surface reports the seek
    /// as complete
    async fn seek(&self, timestamp: f64) -> Result<(), DomainError>;

    /// Rasterise the currently displayed frame at `size`
    async fn capture_frame(&self, size: FrameSize) -> Result<Frame, DomainError>;

    /// Drop any pending seek completion handler
    async fn clear_seek_handler(&self);

    /// Current playback position in seconds
    async fn position(&self) -> f64;
}

/// Settings handed to `TranscodeEnginePort::load`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineLoadConfig {
    /// Engine executable
    pub binary: PathBuf,
    /// Scratch root for the engine filesystem; system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for EngineLoadConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
            scratch_dir: None,
        }
    }
}

/// Contents returned by `read_file`; anything but `Binary` is unexpected for media
#[derive(Debug, Clone, PartialEq)]
pub enum FileData {
    Binary(Vec<u8>),
    Text(String),
}

/// Port for the external transcoding engine
///
/// Runs one job at a time against its own private filesystem.
#[async_trait]
pub trait TranscodeEnginePort: Send + Sync {
    /// Fetch and initialise the engine; required before any other call
    async fn load(&self, config: &EngineLoadConfig) -> Result<(), DomainError>;

    /// Whether `load` has completed
    async fn is_loaded(&self) -> bool;

    /// Write bytes into the engine filesystem, replacing any existing file
    async fn write_file(&self, name: &str, data: &[u8]) -> Result<(), DomainError>;

    /// Run one job; returns the engine's exit code
    async fn exec(&self, args: &[String]) -> Result<i32, DomainError>;

    /// Read a file back from the engine filesystem
    async fn read_file(&self, name: &str) -> Result<FileData, DomainError>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log error message
    async fn error(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
