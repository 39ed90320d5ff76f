//! FFmpeg execution adapter
//!
//! Runs the `ffmpeg` executable as the transcode engine. A private scratch
//! directory stands in for the engine's virtual filesystem: `write_file` and
//! `read_file` address files inside it and `exec` runs with it as the working
//! directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::adapters::process;
use crate::domain::errors::*;
use crate::ports::*;

struct LoadedEngine {
    binary: PathBuf,
    scratch: TempDir,
}

/// FFmpeg-based transcode engine
pub struct FfmpegProcessEngine {
    state: Mutex<Option<LoadedEngine>>,
}

impl FfmpegProcessEngine {
    /// Create an unloaded engine; call `load` before use
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    /// Engine file names are flat; no separators or parent references
    fn resolve(scratch: &Path, name: &str) -> Result<PathBuf, DomainError> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\');
        if invalid {
            return Err(DomainError::BadArgs(format!(
                "Invalid engine file name: {:?}",
                name
            )));
        }
        Ok(scratch.join(name))
    }
}

impl Default for FfmpegProcessEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscodeEnginePort for FfmpegProcessEngine {
    async fn load(&self, config: &EngineLoadConfig) -> Result<(), DomainError> {
        let probe = process::run(&config.binary, &["-version".to_string()], None, None).await?;
        if !probe.success() {
            return Err(DomainError::EngineFail(format!(
                "{} -version exited with {}: {}",
                config.binary.display(),
                probe.code,
                probe.stderr
            )));
        }
        let banner = String::from_utf8_lossy(&probe.stdout);
        let version = banner.lines().next().unwrap_or("unknown version").to_string();

        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("violet-engine-");
            builder
        };
        let scratch = match &config.scratch_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
        .map_err(|e| DomainError::FsFail(format!("Failed to create engine scratch dir: {}", e)))?;

        info!(%version, scratch = %scratch.path().display(), "Transcode engine loaded");

        *self.state.lock().await = Some(LoadedEngine {
            binary: config.binary.clone(),
            scratch,
        });
        Ok(())
    }

    async fn is_loaded(&self) -> bool {
        self.state.lock().await.is_some()
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<(), DomainError> {
        let state = self.state.lock().await;
        let engine = state
            .as_ref()
            .ok_or_else(|| DomainError::NotReady("Engine is not loaded".to_string()))?;
        let path = Self::resolve(engine.scratch.path(), name)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to write {}: {}", name, e)))?;
        debug!(name, bytes = data.len(), "Engine file written");
        Ok(())
    }

    async fn exec(&self, args: &[String]) -> Result<i32, DomainError> {
        let state = self.state.lock().await;
        let engine = state
            .as_ref()
            .ok_or_else(|| DomainError::NotReady("Engine is not loaded".to_string()))?;

        let mut argv = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
        ];
        argv.extend(args.iter().cloned());

        let output = process::run(&engine.binary, &argv, Some(engine.scratch.path()), None).await?;
        if output.success() {
            debug!(?args, "Engine job finished");
        } else {
            warn!(code = output.code, stderr = %output.stderr, "Engine job failed");
        }
        Ok(output.code)
    }

    async fn read_file(&self, name: &str) -> Result<FileData, DomainError> {
        let state = self.state.lock().await;
        let engine = state
            .as_ref()
            .ok_or_else(|| DomainError::NotReady("Engine is not loaded".to_string()))?;
        let path = Self::resolve(engine.scratch.path(), name)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DomainError::EngineFail(format!("Failed to read {}: {}", name, e)))?;
        Ok(FileData::Binary(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_paths() {
        let root = Path::new("/tmp/engine");
        assert!(FfmpegProcessEngine::resolve(root, "input.mp4").is_ok());
        assert!(FfmpegProcessEngine::resolve(root, "").is_err());
        assert!(FfmpegProcessEngine::resolve(root, "..").is_err());
        assert!(FfmpegProcessEngine::resolve(root, "../etc/passwd").is_err());
        assert!(FfmpegProcessEngine::resolve(root, "a\\b").is_err());
    }

    #[tokio::test]
    async fn test_calls_before_load_are_not_ready() {
        let engine = FfmpegProcessEngine::new();
        assert!(!engine.is_loaded().await);
        assert!(matches!(
            engine.write_file("input.mp4", b"x").await,
            Err(DomainError::NotReady(_))
        ));
        assert!(matches!(
            engine.exec(&["-version".to_string()]).await,
            Err(DomainError::NotReady(_))
        ));
        assert!(matches!(
            engine.read_file("output.mp4").await,
            Err(DomainError::NotReady(_))
        ));
    }

    #[tokio::test]
    async fn test_load_with_missing_binary_fails() {
        let engine = FfmpegProcessEngine::new();
        let config = EngineLoadConfig {
            binary: PathBuf::from("/nonexistent/violet-ffmpeg"),
            scratch_dir: None,
        };
        assert!(matches!(
            engine.load(&config).await,
            Err(DomainError::EngineFail(_))
        ));
        assert!(!engine.is_loaded().await);
    }
}
