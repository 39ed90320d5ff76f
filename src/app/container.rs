use std::sync::Arc;

use crate::adapters::{FfmpegFrameSurface, FfmpegProcessEngine, TracingLogAdapter};
use crate::app::config::EditorConfig;
use crate::app::editor::EditorSession;
use crate::domain::errors::DomainError;
use crate::ports::{LogPort, MediaSurfacePort, TranscodeEnginePort};

pub trait AppContainer: Send + Sync {
    fn config(&self) -> &EditorConfig;
    fn engine(&self) -> Arc<dyn TranscodeEnginePort>;
    fn surface(&self) -> Arc<dyn MediaSurfacePort>;
    fn log_port(&self) -> Arc<dyn LogPort>;

    /// Fresh editor session over the shared ports
    fn editor_session(&self) -> Result<EditorSession, DomainError> {
        EditorSession::new(
            self.engine(),
            self.surface(),
            self.log_port(),
            self.config().clone(),
        )
    }
}

pub struct DefaultAppContainer {
    config: EditorConfig,
    engine: Arc<FfmpegProcessEngine>,
    surface: Arc<FfmpegFrameSurface>,
    log_port: Arc<TracingLogAdapter>,
}

impl DefaultAppContainer {
    pub fn new(config: EditorConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let engine = Arc::new(FfmpegProcessEngine::new());
        let surface = Arc::new(FfmpegFrameSurface::new(
            config.engine.ffmpeg_path.clone(),
            config.engine.ffprobe_path.clone(),
        ));
        let log_port = Arc::new(TracingLogAdapter::new(config.log_level()).with_target("editor"));

        Ok(Self {
            config,
            engine,
            surface,
            log_port,
        })
    }

    /// Concrete surface, for callers that need probing beyond the port
    pub fn frame_surface(&self) -> Arc<FfmpegFrameSurface> {
        Arc::clone(&self.surface)
    }
}

impl AppContainer for DefaultAppContainer {
    fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn engine(&self) -> Arc<dyn TranscodeEnginePort> {
        Arc::clone(&self.engine) as Arc<dyn TranscodeEnginePort>
    }

    fn surface(&self) -> Arc<dyn MediaSurfacePort> {
        Arc::clone(&self.surface) as Arc<dyn MediaSurfacePort>
    }

    fn log_port(&self) -> Arc<dyn LogPort> {
        Arc::clone(&self.log_port) as Arc<dyn LogPort>
    }
}
