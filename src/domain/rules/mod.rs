// Domain rules - Sampling schedule, timeline arithmetic and naming policies

use chrono::{DateTime, Utc};

use crate::domain::model::*;

/// Evenly spaced capture schedule across a clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    duration: f64,
    count: usize,
}

impl SamplingPlan {
    /// `None` while the duration is unknown or degenerate; sampling is retried
    /// once metadata arrives
    pub fn new(duration: f64, count: usize) -> Option<Self> {
        if count == 0 || !duration.is_finite() || duration <= 0.0 {
            return None;
        }
        Some(Self { duration, count })
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn interval(&self) -> f64 {
        self.duration / self.count as f64
    }

    /// Source position of capture `index`, never past the clip end
    pub fn timestamp(&self, index: usize) -> f64 {
        (self.duration * index as f64 / self.count as f64).min(self.duration)
    }

    /// Exactly `count` timestamps in increasing order
    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(move |i| self.timestamp(i))
    }
}

/// Timeline bounding box in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    pub left: f64,
    pub width: f64,
}

impl TimelineGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Pointer offset inside the box, clamped to `[0, width]`
    pub fn clamp_offset(&self, client_x: f64) -> f64 {
        (client_x - self.left).clamp(0.0, self.width.max(0.0))
    }

    /// Client x of a percent position
    pub fn percent_to_x(&self, percent: f64) -> f64 {
        self.left + percent / 100.0 * self.width
    }
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self {
            left: 0.0,
            width: 0.0,
        }
    }
}

/// Handle position as a percent of timeline width; 0 when the duration is unusable
pub fn time_to_percent(time: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !time.is_finite() {
        return 0.0;
    }
    (time / duration * 100.0).clamp(0.0, 100.0)
}

/// Time under the pointer, or `None` when the timeline cannot be mapped
pub fn pointer_to_time(client_x: f64, geometry: &TimelineGeometry, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0.0 || !(geometry.width > 0.0) || !client_x.is_finite() {
        return None;
    }
    let offset = geometry.clamp_offset(client_x);
    Some(offset * duration / geometry.width)
}

/// Stream-copy cut arguments for the transcode engine
pub fn stream_copy_argv(input: &str, output: &str, range: &SelectionRange) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string(),
        "-ss".to_string(),
        TimeSpec::from_seconds(range.start()).format_arg(),
        "-to".to_string(),
        TimeSpec::from_seconds(range.end()).format_arg(),
        "-c".to_string(),
        "copy".to_string(),
        output.to_string(),
    ]
}

/// Download name with a millisecond timestamp suffix, e.g. `trimmed-video-1700000000000.mp4`
pub fn download_name(prefix: &str, extension: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}.{}", prefix, now.timestamp_millis(), extension)
}
