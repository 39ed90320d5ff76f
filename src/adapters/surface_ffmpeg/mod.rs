//! FFmpeg frame surface adapter
//!
//! Plays the role of the playback element: the source is copied to a private
//! temp file, `ffprobe` supplies the metadata, a seek decodes the frame at the
//! requested position and keeps it as the current frame, and a capture scales
//! that frame onto the canvas.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::adapters::process;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Container metadata reported by ffprobe
#[derive(Debug, Clone, Serialize)]
pub struct MediaProbe {
    pub duration: Option<f64>,
    pub format_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub bit_rate: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    format_name: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
}

impl MediaProbe {
    /// Parse `ffprobe -print_format json -show_format` output
    pub fn from_json(json: &[u8]) -> Result<Self, DomainError> {
        let document: ProbeDocument = serde_json::from_slice(json)
            .map_err(|e| DomainError::SurfaceFail(format!("Unreadable ffprobe output: {}", e)))?;
        let format = document.format.ok_or_else(|| {
            DomainError::SurfaceFail("ffprobe reported no format section".to_string())
        })?;
        let duration = format
            .duration
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0);
        Ok(Self {
            duration,
            format_name: format.format_name,
            size_bytes: format.size.as_deref().and_then(|s| s.parse().ok()),
            bit_rate: format.bit_rate.as_deref().and_then(|s| s.parse().ok()),
        })
    }
}

#[derive(Default)]
struct SurfaceState {
    source: Option<NamedTempFile>,
    position: f64,
    current_frame: Option<Vec<u8>>,
    pending_seek: Option<f64>,
}

/// FFmpeg-backed playback surface
pub struct FfmpegFrameSurface {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    state: Mutex<SurfaceState>,
}

impl FfmpegFrameSurface {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            state: Mutex::new(SurfaceState::default()),
        }
    }

    /// Probe a file on disk
    pub async fn probe_path(&self, path: &Path) -> Result<MediaProbe, DomainError> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            path.to_string_lossy().to_string(),
        ];
        let output = process::run(&self.ffprobe, &args, None, None)
            .await
            .map_err(|e| DomainError::SurfaceFail(e.to_string()))?;
        if !output.success() {
            return Err(DomainError::SurfaceFail(format!(
                "ffprobe exited with {}: {}",
                output.code, output.stderr
            )));
        }
        MediaProbe::from_json(&output.stdout)
    }

    /// Whether a seek was issued and has not completed
    pub async fn has_pending_seek(&self) -> bool {
        self.state.lock().await.pending_seek.is_some()
    }

    fn extension_of(name: &str) -> String {
        Path::new(name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }
}

#[async_trait]
impl MediaSurfacePort for FfmpegFrameSurface {
    async fn attach(&self, source: &SourceClip) -> Result<Option<f64>, DomainError> {
        let suffix = Self::extension_of(&source.name);
        let mut file = tempfile::Builder::new()
            .prefix("violet-source-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| DomainError::FsFail(format!("Failed to stage source: {}", e)))?;
        {
            use std::io::Write;
            file.write_all(&source.bytes())
                .and_then(|_| file.flush())
                .map_err(|e| DomainError::FsFail(format!("Failed to stage source: {}", e)))?;
        }

        let probe = self.probe_path(file.path()).await?;
        info!(
            name = %source.name,
            duration = ?probe.duration,
            format = ?probe.format_name,
            "Surface metadata loaded"
        );

        let mut state = self.state.lock().await;
        *state = SurfaceState {
            source: Some(file),
            ..SurfaceState::default()
        };
        Ok(probe.duration)
    }

    async fn seek(&self, timestamp: f64) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        let source = state
            .source
            .as_ref()
            .map(|file| file.path().to_string_lossy().to_string())
            .ok_or_else(|| DomainError::NotReady("No source attached".to_string()))?;
        state.pending_seek = Some(timestamp);

        let args = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-ss".to_string(),
            TimeSpec::from_seconds(timestamp).format_arg(),
            "-i".to_string(),
            source,
            "-frames:v".to_string(),
            "1".to_string(),
            "-f".to_string(),
            "image2pipe".to_string(),
            "-c:v".to_string(),
            "mjpeg".to_string(),
            "-".to_string(),
        ];
        let output = process::run(&self.ffmpeg, &args, None, None)
            .await
            .map_err(|e| DomainError::SurfaceFail(e.to_string()))?;
        if !output.success() || output.stdout.is_empty() {
            return Err(DomainError::SurfaceFail(format!(
                "No frame decoded at {:.3}s: {}",
                timestamp, output.stderr
            )));
        }

        debug!(timestamp, bytes = output.stdout.len(), "Seek completed");
        state.position = timestamp;
        state.current_frame = Some(output.stdout);
        state.pending_seek = None;
        Ok(())
    }

    async fn capture_frame(&self, size: FrameSize) -> Result<Frame, DomainError> {
        let current = {
            let state = self.state.lock().await;
            state
                .current_frame
                .clone()
                .ok_or_else(|| DomainError::NotReady("No frame decoded yet".to_string()))?
        };

        let args = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "mjpeg".to_string(),
            "-i".to_string(),
            "-".to_string(),
            "-vf".to_string(),
            format!("scale={}:{}", size.width, size.height),
            "-frames:v".to_string(),
            "1".to_string(),
            "-f".to_string(),
            "image2pipe".to_string(),
            "-c:v".to_string(),
            "mjpeg".to_string(),
            "-".to_string(),
        ];
        let output = process::run(&self.ffmpeg, &args, None, Some(current))
            .await
            .map_err(|e| DomainError::SurfaceFail(e.to_string()))?;
        if !output.success() || output.stdout.is_empty() {
            return Err(DomainError::SurfaceFail(format!(
                "Frame scaling failed: {}",
                output.stderr
            )));
        }

        Ok(Frame {
            size,
            format: ImageFormat::Jpeg,
            data: output.stdout,
        })
    }

    async fn clear_seek_handler(&self) {
        self.state.lock().await.pending_seek = None;
    }

    async fn position(&self) -> f64 {
        self.state.lock().await.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_json_parsing() {
        let json = br#"{"format": {"filename": "a.mp4", "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "30.033333", "size": "1048576", "bit_rate": "279620"}}"#;
        let probe = MediaProbe::from_json(json).unwrap();
        assert_eq!(probe.duration, Some(30.033333));
        assert_eq!(probe.format_name.as_deref(), Some("mov,mp4,m4a,3gp,3g2,mj2"));
        assert_eq!(probe.size_bytes, Some(1_048_576));
        assert_eq!(probe.bit_rate, Some(279_620));
    }

    #[test]
    fn test_probe_json_without_duration() {
        let probe = MediaProbe::from_json(br#"{"format": {"duration": "N/A"}}"#).unwrap();
        assert_eq!(probe.duration, None);
        let probe = MediaProbe::from_json(br#"{"format": {"duration": "0.000000"}}"#).unwrap();
        assert_eq!(probe.duration, None);
    }

    #[test]
    fn test_probe_json_errors() {
        assert!(MediaProbe::from_json(b"not json").is_err());
        assert!(MediaProbe::from_json(b"{}").is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(FfmpegFrameSurface::extension_of("clip.mov"), ".mov");
        assert_eq!(FfmpegFrameSurface::extension_of("clip"), "");
    }

    #[tokio::test]
    async fn test_seek_without_source() {
        let surface = FfmpegFrameSurface::new("ffmpeg", "ffprobe");
        assert!(matches!(surface.seek(1.0).await, Err(DomainError::NotReady(_))));
        assert!(matches!(
            surface.capture_frame(FrameSize::default()).await,
            Err(DomainError::NotReady(_))
        ));
        assert!(!surface.has_pending_seek().await);
        assert_eq!(surface.position().await, 0.0);
    }
}
