//! Editor configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::model::FrameSize;
use crate::ports::{EngineLoadConfig, LogLevel};

/// Default number of thumbnails in the strip
pub const DEFAULT_THUMBNAIL_COUNT: usize = 15;

/// Complete editor configuration; every field has a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub sampler: SamplerConfig,
    pub engine: EngineConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Thumbnail sampler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Number of frames in the strip
    pub thumbnail_count: usize,
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Upper bound on a single seek
    pub seek_timeout_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            thumbnail_count: DEFAULT_THUMBNAIL_COUNT,
            canvas_width: 160,
            canvas_height: 90,
            seek_timeout_ms: 5000,
        }
    }
}

impl SamplerConfig {
    pub fn canvas(&self) -> Result<FrameSize, DomainError> {
        FrameSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn seek_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_timeout_ms)
    }
}

/// Transcode engine and surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// ffmpeg executable
    pub ffmpeg_path: PathBuf,
    /// ffprobe executable
    pub ffprobe_path: PathBuf,
    /// Name of the source inside the engine filesystem
    pub input_name: String,
    /// Name of the result inside the engine filesystem
    pub output_name: String,
    /// Scratch root; system temp dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            input_name: "input.mp4".to_string(),
            output_name: "output.mp4".to_string(),
            scratch_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn load_config(&self) -> EngineLoadConfig {
        EngineLoadConfig {
            binary: self.ffmpeg_path.clone(),
            scratch_dir: self.scratch_dir.clone(),
        }
    }
}

/// Output artifact settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Download name prefix, suffixed with a millisecond timestamp
    pub download_prefix: String,
    pub extension: String,
    pub mime: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            download_prefix: "trimmed-video".to_string(),
            extension: "mp4".to_string(),
            mime: "video/mp4".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EditorConfig {
    /// Reject values the editor cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.sampler.thumbnail_count == 0 {
            return Err(DomainError::ConfigFail(
                "sampler.thumbnail_count must be at least 1".to_string(),
            ));
        }
        self.sampler
            .canvas()
            .map_err(|e| DomainError::ConfigFail(format!("sampler canvas: {}", e)))?;
        if self.sampler.seek_timeout_ms == 0 {
            return Err(DomainError::ConfigFail(
                "sampler.seek_timeout_ms must be positive".to_string(),
            ));
        }
        if self.engine.input_name.is_empty() || self.engine.output_name.is_empty() {
            return Err(DomainError::ConfigFail(
                "engine input_name and output_name cannot be empty".to_string(),
            ));
        }
        if self.engine.input_name == self.engine.output_name {
            return Err(DomainError::ConfigFail(
                "engine input_name and output_name must differ".to_string(),
            ));
        }
        LogLevel::parse(&self.logging.level)
            .map_err(|e| DomainError::ConfigFail(e.to_string()))?;
        Ok(())
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.logging.level).unwrap_or(LogLevel::Info)
    }
}
