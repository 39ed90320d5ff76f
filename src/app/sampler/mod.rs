// Thumbnail sampler - Seek-then-capture loop over the playback surface

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::app::config::SamplerConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::SamplingPlan;
use crate::ports::MediaSurfacePort;

/// Produces an evenly spaced strip of still frames
#[derive(Debug, Clone)]
pub struct ThumbnailSampler {
    count: usize,
    canvas: FrameSize,
    seek_timeout: Duration,
}

impl ThumbnailSampler {
    pub fn new(count: usize, canvas: FrameSize, seek_timeout: Duration) -> Self {
        Self {
            count,
            canvas,
            seek_timeout,
        }
    }

    pub fn from_config(config: &SamplerConfig) -> Result<Self, DomainError> {
        Ok(Self::new(
            config.thumbnail_count,
            config.canvas()?,
            config.seek_timeout(),
        ))
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn canvas(&self) -> FrameSize {
        self.canvas
    }

    /// Capture `count` frames across `duration`.
    ///
    /// Strictly serial: each seek must complete and its frame be captured
    /// before the next seek is issued. `on_progress` sees the strip after
    /// every capture. An unknown or zero duration is a no-op returning an
    /// empty strip. The surface's seek handler is cleared on every exit path.
    pub async fn generate<F>(
        &self,
        surface: &dyn MediaSurfacePort,
        duration: f64,
        mut on_progress: F,
    ) -> Result<ThumbnailStrip, CaptureError>
    where
        F: FnMut(&ThumbnailStrip),
    {
        let plan = match SamplingPlan::new(duration, self.count) {
            Some(plan) => plan,
            None => {
                debug!(duration, "Duration not usable yet, skipping thumbnail capture");
                return Ok(ThumbnailStrip::default());
            }
        };

        info!(
            count = plan.count(),
            interval = plan.interval(),
            "Generating thumbnails"
        );

        let mut strip = ThumbnailStrip::with_capacity(plan.count());
        let result = self
            .capture_all(surface, &plan, &mut strip, &mut on_progress)
            .await;
        surface.clear_seek_handler().await;

        match result {
            Ok(()) => Ok(strip),
            Err(e) => {
                warn!(captured = strip.len(), error = %e, "Thumbnail capture stopped");
                Err(e)
            }
        }
    }

    async fn capture_all<F>(
        &self,
        surface: &dyn MediaSurfacePort,
        plan: &SamplingPlan,
        strip: &mut ThumbnailStrip,
        on_progress: &mut F,
    ) -> Result<(), CaptureError>
    where
        F: FnMut(&ThumbnailStrip),
    {
        for index in 0..plan.count() {
            let timestamp = plan.timestamp(index);

            match timeout(self.seek_timeout, surface.seek(timestamp)).await {
                Err(_) => {
                    return Err(CaptureError::SeekTimeout {
                        index,
                        timestamp,
                        timeout: self.seek_timeout,
                    })
                }
                Ok(Err(source)) => {
                    return Err(CaptureError::SeekFailed {
                        index,
                        timestamp,
                        source,
                    })
                }
                Ok(Ok(())) => {}
            }

            // Capturing spawns its own decode on some surfaces; bound it like the seek
            let frame = match timeout(self.seek_timeout, surface.capture_frame(self.canvas)).await {
                Err(_) => {
                    return Err(CaptureError::SnapshotFailed {
                        index,
                        source: DomainError::SurfaceFail(format!(
                            "Frame capture timed out after {:?}",
                            self.seek_timeout
                        )),
                    })
                }
                Ok(result) => {
                    result.map_err(|source| CaptureError::SnapshotFailed { index, source })?
                }
            };

            strip
                .push(Thumbnail {
                    index,
                    timestamp,
                    frame,
                })
                .map_err(|source| CaptureError::SnapshotFailed { index, source })?;
            debug!(index, timestamp, "Thumbnail captured");
            on_progress(strip);
        }
        Ok(())
    }
}

impl Default for ThumbnailSampler {
    fn default() -> Self {
        let config = SamplerConfig::default();
        Self::new(
            config.thumbnail_count,
            FrameSize::default(),
            config.seek_timeout(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedSurface {
        seeks: Mutex<Vec<f64>>,
        position: Mutex<f64>,
        hang_at: Option<usize>,
        fail_seek_at: Option<usize>,
        fail_capture_at: Option<usize>,
        hang_capture_at: Option<usize>,
        cleared: AtomicBool,
    }

    #[async_trait]
    impl MediaSurfacePort for ScriptedSurface {
        async fn attach(&self, _source: &SourceClip) -> Result<Option<f64>, DomainError> {
            Ok(Some(30.0))
        }

        async fn seek(&self, timestamp: f64) -> Result<(), DomainError> {
            let index = {
                let mut seeks = self.seeks.lock().unwrap();
                seeks.push(timestamp);
                seeks.len() - 1
            };
            if self.hang_at == Some(index) {
                std::future::pending::<()>().await;
            }
            if self.fail_seek_at == Some(index) {
                return Err(DomainError::SurfaceFail("decoder error".to_string()));
            }
            *self.position.lock().unwrap() = timestamp;
            Ok(())
        }

        async fn capture_frame(&self, size: FrameSize) -> Result<Frame, DomainError> {
            let index = self.seeks.lock().unwrap().len() - 1;
            if self.hang_capture_at == Some(index) {
                std::future::pending::<()>().await;
            }
            if self.fail_capture_at == Some(index) {
                return Err(DomainError::SurfaceFail("tainted canvas".to_string()));
            }
            Ok(Frame {
                size,
                format: ImageFormat::Jpeg,
                data: vec![index as u8],
            })
        }

        async fn clear_seek_handler(&self) {
            self.cleared.store(true, Ordering::Relaxed);
        }

        async fn position(&self) -> f64 {
            *self.position.lock().unwrap()
        }
    }

    fn sampler() -> ThumbnailSampler {
        ThumbnailSampler::new(15, FrameSize::default(), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_thirty_second_clip() {
        let surface = ScriptedSurface::default();
        let mut updates = Vec::new();
        let strip = sampler()
            .generate(&surface, 30.0, |s| updates.push(s.len()))
            .await
            .unwrap();

        let expected: Vec<f64> = (0..15).map(|i| i as f64 * 2.0).collect();
        assert_eq!(strip.timestamps(), expected);
        assert_eq!(*surface.seeks.lock().unwrap(), expected);
        assert_eq!(updates, (1..=15).collect::<Vec<_>>());
        assert!(strip.is_complete());
        assert_eq!(strip.get(7).unwrap().frame.data, vec![7]);
        assert!(surface.cleared.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_unknown_duration_is_noop() {
        let surface = ScriptedSurface::default();
        let mut updates = 0;
        let strip = sampler()
            .generate(&surface, 0.0, |_| updates += 1)
            .await
            .unwrap();
        assert!(strip.is_empty());
        assert_eq!(updates, 0);
        assert!(surface.seeks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seek_timeout() {
        let surface = ScriptedSurface {
            hang_at: Some(3),
            ..Default::default()
        };
        let mut captured = 0;
        let err = sampler()
            .generate(&surface, 30.0, |s| captured = s.len())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CaptureError::SeekTimeout { index: 3, timestamp, .. } if timestamp == 6.0
        ));
        assert_eq!(captured, 3);
        assert_eq!(surface.seeks.lock().unwrap().len(), 4);
        assert!(surface.cleared.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_capture_timeout() {
        let surface = ScriptedSurface {
            hang_capture_at: Some(5),
            ..Default::default()
        };
        let mut captured = 0;
        let err = sampler()
            .generate(&surface, 30.0, |s| captured = s.len())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CaptureError::SnapshotFailed { index: 5, source: DomainError::SurfaceFail(ref m) }
                if m.contains("timed out")
        ));
        assert_eq!(captured, 5);
        assert_eq!(surface.seeks.lock().unwrap().len(), 6);
        assert!(surface.cleared.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_seek_and_snapshot_failures() {
        let surface = ScriptedSurface {
            fail_seek_at: Some(0),
            ..Default::default()
        };
        let err = sampler().generate(&surface, 30.0, |_| {}).await.unwrap_err();
        assert!(matches!(err, CaptureError::SeekFailed { index: 0, .. }));

        let surface = ScriptedSurface {
            fail_capture_at: Some(14),
            ..Default::default()
        };
        let err = sampler().generate(&surface, 30.0, |_| {}).await.unwrap_err();
        assert_eq!(err.index(), 14);
        assert!(surface.cleared.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_never_overshoots_duration() {
        let surface = ScriptedSurface::default();
        let strip = ThumbnailSampler::new(7, FrameSize::default(), Duration::from_millis(50))
            .generate(&surface, 0.3, |_| {})
            .await
            .unwrap();
        assert_eq!(strip.len(), 7);
        assert!(strip.timestamps().iter().all(|&t| t <= 0.3));
    }
}
