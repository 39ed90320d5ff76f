//! violet-trim
//!
//! Clip trimming editor: samples a thumbnail strip across a video, lets a
//! caller narrow a `[start, end]` range with two timeline handles, and cuts
//! that range with an ffmpeg stream copy.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{EditorConfig, EditorSession, TrimOutcome};
pub use domain::errors::{CaptureError, DomainError};
pub use domain::model::{OutputClip, SelectionRange, SourceClip, ThumbnailStrip, TimeSpec};
pub use error::{TrimError, TrimResult};
