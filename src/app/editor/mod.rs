// Editor session - Owns and sequences all cross-component state

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::app::config::EditorConfig;
use crate::app::progress::{ObserverSet, SessionObserver};
use crate::app::sampler::ThumbnailSampler;
use crate::app::selector::*;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

pub const MSG_LOADING_ENGINE: &str = "Loading engine…";
pub const MSG_ENGINE_READY: &str = "Engine ready.";
pub const MSG_NOT_READY: &str = "Engine is not loaded or no video selected.";
pub const MSG_NO_RANGE: &str = "Video metadata is not loaded yet.";
pub const MSG_WRITING: &str = "Preparing... writing file into engine memory.";
pub const MSG_TRIMMING: &str = "Trimming...";
pub const MSG_READING: &str = "Reading result...";
pub const MSG_DONE: &str = "Trim complete!";
pub const MSG_UNEXPECTED_OUTPUT: &str = "An error occurred while reading the processed file.";

/// Result of a trim request
#[derive(Debug, Clone, PartialEq)]
pub enum TrimOutcome {
    /// Output clip is available
    Completed,
    /// Engine not loaded, or no source/range; nothing was sent to the engine
    NotReady,
    /// A trim is already running
    Busy,
    /// A phase failed; carries the status message
    Failed(String),
}

/// Centrally owned editor state; mutated only through `EditorSession`
#[derive(Debug, Clone)]
pub struct EditorState {
    pub source: Option<SourceClip>,
    pub duration: Option<f64>,
    pub range: Option<SelectionRange>,
    pub thumbnails: ThumbnailStrip,
    pub output: Option<OutputClip>,
    pub status: Status,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            source: None,
            duration: None,
            range: None,
            thumbnails: ThumbnailStrip::default(),
            output: None,
            status: Status::new(TrimPhase::Idle, ""),
        }
    }
}

/// One editing session: a source clip, its strip, a range, and the engine
pub struct EditorSession {
    engine: Arc<dyn TranscodeEnginePort>,
    surface: Arc<dyn MediaSurfacePort>,
    log_port: Arc<dyn LogPort>,
    config: EditorConfig,
    sampler: ThumbnailSampler,
    selector: RangeSelector,
    observers: ObserverSet,
    state: EditorState,
    engine_ready: bool,
    processing: bool,
}

impl EditorSession {
    /// Create a session with injected ports
    pub fn new(
        engine: Arc<dyn TranscodeEnginePort>,
        surface: Arc<dyn MediaSurfacePort>,
        log_port: Arc<dyn LogPort>,
        config: EditorConfig,
    ) -> Result<Self, DomainError> {
        let sampler = ThumbnailSampler::from_config(&config.sampler)?;
        Ok(Self {
            engine,
            surface,
            log_port,
            config,
            sampler,
            selector: RangeSelector::default(),
            observers: ObserverSet::new(),
            state: EditorState::default(),
            engine_ready: false,
            processing: false,
        })
    }

    pub fn add_observer(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.add(observer);
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn status(&self) -> &Status {
        &self.state.status
    }

    pub fn range(&self) -> Option<SelectionRange> {
        self.state.range
    }

    pub fn thumbnails(&self) -> &ThumbnailStrip {
        &self.state.thumbnails
    }

    pub fn output(&self) -> Option<&OutputClip> {
        self.state.output.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selector(&self) -> &RangeSelector {
        &self.selector
    }

    pub fn is_engine_ready(&self) -> bool {
        self.engine_ready
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Whether the trim trigger is enabled
    pub fn can_trim(&self) -> bool {
        self.engine_ready && self.state.source.is_some() && !self.processing
    }

    /// Load the transcode engine; required before any trim
    pub async fn load_engine(&mut self) -> Result<(), DomainError> {
        self.set_status(TrimPhase::LoadingEngine, MSG_LOADING_ENGINE)
            .await;
        match self.engine.load(&self.config.engine.load_config()).await {
            Ok(()) => {
                self.engine_ready = true;
                self.set_status(TrimPhase::Ready, MSG_ENGINE_READY).await;
                Ok(())
            }
            Err(e) => {
                self.engine_ready = false;
                self.set_status(TrimPhase::Error, e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Replace the source clip and reset everything derived from the old one.
    ///
    /// Returns the duration the surface reported; the host forwards it to
    /// `handle_metadata_loaded` once it wants sampling to start.
    pub async fn select_file(&mut self, source: SourceClip) -> Result<Option<f64>, DomainError> {
        self.log_port
            .info(&format!(
                "Selected {} ({} bytes)",
                source.name,
                source.len()
            ))
            .await;

        self.selector.pointer_up();
        self.state.source = Some(source);
        self.state.duration = None;
        self.state.range = None;
        self.state.thumbnails = ThumbnailStrip::default();
        self.clear_output();
        self.observers
            .notify(|o| o.on_thumbnails(&ThumbnailStrip::default()));
        self.observers.notify(|o| o.on_range(None));

        let attached = match &self.state.source {
            Some(source) => self.surface.attach(source).await,
            None => Ok(None),
        };
        match attached {
            Ok(duration) => Ok(duration),
            Err(e) => {
                self.set_status(TrimPhase::Error, e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Metadata-loaded event: reset the range to the whole clip and sample
    /// the thumbnail strip. A capture failure keeps the partial strip.
    pub async fn handle_metadata_loaded(&mut self, duration: f64) -> Result<(), CaptureError> {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };

        self.state.duration = Some(duration);
        if let Some(source) = self.state.source.as_mut() {
            source.record_duration(duration);
        }
        self.state.range = SelectionRange::full(duration).ok();
        let range = self.state.range;
        self.observers.notify(|o| o.on_range(range.as_ref()));
        self.log_port
            .info(&format!("Metadata loaded, duration {:.3}s", duration))
            .await;

        let observers = self.observers.clone();
        let thumbnails = &mut self.state.thumbnails;
        let result = self
            .sampler
            .generate(self.surface.as_ref(), duration, |strip| {
                *thumbnails = strip.clone();
                observers.notify(|o| o.on_thumbnails(strip));
            })
            .await;

        match result {
            Ok(strip) => {
                self.log_port
                    .info(&format!("Captured {} thumbnails", strip.len()))
                    .await;
                self.state.thumbnails = strip;
                Ok(())
            }
            Err(e) => {
                self.set_status(TrimPhase::Error, format!("Thumbnail capture failed: {}", e))
                    .await;
                Err(e)
            }
        }
    }

    /// Move the start of the range
    pub fn set_start(&mut self, start: f64) -> Result<(), DomainError> {
        let (range, duration) = self.range_and_duration()?;
        self.state.range = Some(range.with_start(start, duration)?);
        self.notify_range();
        Ok(())
    }

    /// Move the end of the range
    pub fn set_end(&mut self, end: f64) -> Result<(), DomainError> {
        let (range, duration) = self.range_and_duration()?;
        self.state.range = Some(range.with_end(end, duration)?);
        self.notify_range();
        Ok(())
    }

    fn range_and_duration(&self) -> Result<(SelectionRange, f64), DomainError> {
        match (self.state.range, self.state.duration) {
            (Some(range), Some(duration)) => Ok((range, duration)),
            _ => Err(DomainError::NotReady(MSG_NO_RANGE.to_string())),
        }
    }

    fn notify_range(&self) {
        let range = self.state.range;
        self.observers.notify(|o| o.on_range(range.as_ref()));
    }

    /// Host reports the timeline's bounding box
    pub fn set_timeline_geometry(&mut self, geometry: TimelineGeometry) {
        self.selector.set_geometry(geometry);
    }

    pub fn pointer_down(&mut self, handle: Handle) -> PointerDown {
        self.selector.pointer_down(handle)
    }

    /// Pointer-down at a timeline position; starts a drag if a handle is hit
    pub fn pointer_down_at(&mut self, client_x: f64) -> Option<PointerDown> {
        let handle = self.selector.hit_test(client_x, &self.selector_props())?;
        Some(self.selector.pointer_down(handle))
    }

    /// Feed a pointer move through the selector; returns whether the range changed
    pub fn pointer_move(&mut self, client_x: f64) -> bool {
        let change = self
            .selector
            .pointer_move(client_x, &self.selector_props());
        match change {
            Some(change) => {
                let before = self.state.range;
                change.dispatch(&mut *self);
                before != self.state.range
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.selector.pointer_up();
    }

    /// Render model of the selector for the current state
    pub fn layout(&self) -> TimelineLayout {
        self.selector.layout(&self.selector_props())
    }

    fn selector_props(&self) -> SelectorProps<'_> {
        let (start, end) = self
            .state
            .range
            .map(|r| (r.start(), r.end()))
            .unwrap_or((0.0, self.state.duration.unwrap_or(0.0)));
        SelectorProps {
            thumbnails: &self.state.thumbnails,
            start,
            end,
            duration: self.state.duration.unwrap_or(0.0),
        }
    }

    /// Cut the selected range out of the source with a stream-copy job
    pub async fn request_trim(&mut self) -> TrimOutcome {
        if self.processing {
            return TrimOutcome::Busy;
        }

        let ready = self.engine_ready && self.engine.is_loaded().await;
        let source = match self.state.source.clone() {
            Some(source) if ready => source,
            _ => {
                self.set_status(TrimPhase::NotReady, MSG_NOT_READY).await;
                return TrimOutcome::NotReady;
            }
        };
        let range = match self.state.range {
            Some(range) => range,
            None => {
                self.set_status(TrimPhase::NotReady, MSG_NO_RANGE).await;
                return TrimOutcome::NotReady;
            }
        };

        self.processing = true;
        self.clear_output();
        let result = self.run_trim(&source, range).await;
        self.processing = false;

        match result {
            Ok(output) => {
                self.set_status(TrimPhase::Done, MSG_DONE).await;
                self.observers.notify(|o| o.on_output(Some(&output)));
                self.state.output = Some(output);
                TrimOutcome::Completed
            }
            Err(message) => {
                self.set_status(TrimPhase::Error, message.clone()).await;
                TrimOutcome::Failed(message)
            }
        }
    }

    /// Drop the previous output clip; it belongs to an older source or range
    fn clear_output(&mut self) {
        if self.state.output.take().is_some() {
            self.observers.notify(|o| o.on_output(None));
        }
    }

    async fn run_trim(
        &mut self,
        source: &SourceClip,
        range: SelectionRange,
    ) -> Result<OutputClip, String> {
        let input_name = self.config.engine.input_name.clone();
        let output_name = self.config.engine.output_name.clone();

        self.set_status(TrimPhase::Writing, MSG_WRITING).await;
        self.engine
            .write_file(&input_name, &source.bytes())
            .await
            .map_err(|e| e.to_string())?;

        self.set_status(TrimPhase::Processing, MSG_TRIMMING).await;
        let argv = stream_copy_argv(&input_name, &output_name, &range);
        self.log_port
            .debug(&format!("Running stream-copy job: {}", argv.join(" ")))
            .await;
        let code = self.engine.exec(&argv).await.map_err(|e| e.to_string())?;
        if code != 0 {
            return Err(format!("Engine exited with code {}", code));
        }

        self.set_status(TrimPhase::Reading, MSG_READING).await;
        let bytes = match self
            .engine
            .read_file(&output_name)
            .await
            .map_err(|e| e.to_string())?
        {
            FileData::Binary(bytes) => bytes,
            FileData::Text(_) => return Err(MSG_UNEXPECTED_OUTPUT.to_string()),
        };

        let now = Utc::now();
        Ok(OutputClip {
            bytes,
            mime: self.config.output.mime.clone(),
            download_name: download_name(
                &self.config.output.download_prefix,
                &self.config.output.extension,
                now,
            ),
            range,
            created_at: now,
        })
    }

    async fn set_status(&mut self, phase: TrimPhase, message: impl Into<String>) {
        let status = Status::new(phase, message);
        match phase {
            TrimPhase::Error => self.log_port.error(&status.message).await,
            TrimPhase::NotReady => self.log_port.warn(&status.message).await,
            _ => self.log_port.info(&status.message).await,
        }
        self.observers.notify(|o| o.on_status(&status));
        self.state.status = status;
    }
}

impl RangeChangeHandler for EditorSession {
    fn on_start_change(&mut self, time: f64) {
        if let Err(e) = self.set_start(time) {
            debug!(time, error = %e, "Start change rejected");
        }
    }

    fn on_end_change(&mut self, time: f64) {
        if let Err(e) = self.set_end(time) {
            debug!(time, error = %e, "End change rejected");
        }
    }
}
