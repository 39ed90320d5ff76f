// Domain models - Core types and data structures

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::DomainError;

/// Time specification - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Seconds as f64
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        // Plain seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(DomainError::BadArgs("Time must be a finite number".to_string()));
            }
            if seconds < 0.0 {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = minutes
                    .parse::<u32>()
                    .map_err(|_| DomainError::BadArgs("Invalid minutes format".to_string()))?;
                let seconds = Self::parse_seconds_part(seconds)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = hours
                    .parse::<u32>()
                    .map_err(|_| DomainError::BadArgs("Invalid hours format".to_string()))?;
                let minutes = minutes
                    .parse::<u32>()
                    .map_err(|_| DomainError::BadArgs("Invalid minutes format".to_string()))?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
                }
                let seconds = Self::parse_seconds_part(seconds)?;
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(DomainError::BadArgs(
                "Invalid time format. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)".to_string(),
            )),
        }
    }

    fn parse_seconds_part(part: &str) -> Result<f64, DomainError> {
        let seconds = part
            .parse::<f64>()
            .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
        if !(0.0..60.0).contains(&seconds) {
            return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
        }
        Ok(seconds)
    }

    /// Format as HH:MM:SS, truncating fractional seconds
    pub fn format_clock(&self) -> String {
        let total = self.seconds.max(0.0) as u64;
        format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
    }

    /// Format as an engine argument: shortest decimal, `10` for 10.0
    pub fn format_arg(&self) -> String {
        format!("{}", self.seconds)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_clock())
    }
}

/// The clip the user selected, shared with the surface and the engine
#[derive(Debug, Clone)]
pub struct SourceClip {
    pub name: String,
    bytes: Arc<[u8]>,
    duration: Option<f64>,
}

impl SourceClip {
    /// Wrap raw bytes; no container or codec validation is done
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::from(bytes),
            duration: None,
        }
    }

    /// Read a clip from disk
    pub async fn from_path(path: &std::path::Path) -> Result<Self, DomainError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to read {}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "input".to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decoded duration, once the surface has reported metadata
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub(crate) fn record_duration(&mut self, duration: f64) {
        self.duration = Some(duration);
    }
}

/// Raster dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::BadArgs("Frame dimensions cannot be zero".to_string()));
        }
        Ok(Self { width, height })
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: 160,
            height: 90,
        }
    }
}

/// Encoding of a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageFormat {
    Jpeg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// One still frame captured from the surface
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: FrameSize,
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

/// A captured frame tagged with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub index: usize,
    pub timestamp: f64,
    pub frame: Frame,
}

/// Ordered preview frames sampled across the clip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailStrip {
    expected: usize,
    items: Vec<Thumbnail>,
}

impl ThumbnailStrip {
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            expected,
            items: Vec::with_capacity(expected),
        }
    }

    /// Append the next capture; indices must arrive in order
    pub fn push(&mut self, thumbnail: Thumbnail) -> Result<(), DomainError> {
        if thumbnail.index != self.items.len() {
            return Err(DomainError::InternalError(format!(
                "Thumbnail {} appended at position {}",
                thumbnail.index,
                self.items.len()
            )));
        }
        if self.expected > 0 && self.items.len() >= self.expected {
            return Err(DomainError::InternalError(format!(
                "Strip already holds {} thumbnails",
                self.expected
            )));
        }
        self.items.push(thumbnail);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn is_complete(&self) -> bool {
        self.expected > 0 && self.items.len() == self.expected
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Thumbnail> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Thumbnail> {
        self.items.get(index)
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.items.iter().map(|t| t.timestamp).collect()
    }
}

/// Selected `[start, end]` sub-range, always `0 <= start < end <= duration`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionRange {
    start: f64,
    end: f64,
}

impl SelectionRange {
    /// The whole clip
    pub fn full(duration: f64) -> Result<Self, DomainError> {
        Self::new(0.0, duration, duration)
    }

    /// Create a range validated against the clip duration
    pub fn new(start: f64, end: f64, duration: f64) -> Result<Self, DomainError> {
        if !(start.is_finite() && end.is_finite() && duration.is_finite()) {
            return Err(DomainError::InvalidRange(
                "Range bounds must be finite".to_string(),
            ));
        }
        if start < 0.0 {
            return Err(DomainError::InvalidRange(format!(
                "start ({}) cannot be negative",
                start
            )));
        }
        if start >= end {
            return Err(DomainError::InvalidRange(format!(
                "start ({}) must be less than end ({})",
                start, end
            )));
        }
        if end > duration {
            return Err(DomainError::InvalidRange(format!(
                "end ({}) exceeds duration ({})",
                end, duration
            )));
        }
        Ok(Self { start, end })
    }

    /// Move the start handle; rejected if it would reach or cross the end
    pub fn with_start(&self, start: f64, duration: f64) -> Result<Self, DomainError> {
        Self::new(start, self.end, duration)
    }

    /// Move the end handle; rejected if it would reach or cross the start
    pub fn with_end(&self, end: f64, duration: f64) -> Result<Self, DomainError> {
        Self::new(self.start, end, duration)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Bytes produced by a successful trim
#[derive(Debug, Clone, PartialEq)]
pub struct OutputClip {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub download_name: String,
    pub range: SelectionRange,
    pub created_at: DateTime<Utc>,
}

impl OutputClip {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the clip under `target`; a directory receives `download_name`
    pub async fn save_to(&self, target: &std::path::Path) -> Result<std::path::PathBuf, DomainError> {
        let path = if target.is_dir() {
            target.join(&self.download_name)
        } else {
            target.to_path_buf()
        };
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Phase shown on the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrimPhase {
    Idle,
    LoadingEngine,
    Ready,
    Writing,
    Processing,
    Reading,
    Done,
    NotReady,
    Error,
}

/// Human-readable status line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub phase: TrimPhase,
    pub message: String,
}

impl Status {
    pub fn new(phase: TrimPhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
