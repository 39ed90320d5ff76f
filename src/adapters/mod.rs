// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod process;
pub mod surface_ffmpeg;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FfmpegProcessEngine;
pub use surface_ffmpeg::{FfmpegFrameSurface, MediaProbe};
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::TracingLogAdapter;
