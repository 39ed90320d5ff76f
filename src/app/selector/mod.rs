// Range selector - Timeline with two draggable boundary handles
//
// Controlled component: the caller owns the range and passes it in on every
// call; the selector only owns the drag state and reports proposed changes.

use tracing::trace;

use crate::domain::model::*;
use crate::domain::rules::{pointer_to_time, time_to_percent, TimelineGeometry};

/// Half the rendered handle width; handles are centred on their time
pub const HANDLE_HALF_WIDTH_PX: f64 = 8.0;

/// Range endpoint bound to a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Start,
    End,
}

/// Pointer-drag state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingStart,
    DraggingEnd,
}

impl DragState {
    pub fn handle(&self) -> Option<Handle> {
        match self {
            DragState::Idle => None,
            DragState::DraggingStart => Some(Handle::Start),
            DragState::DraggingEnd => Some(Handle::End),
        }
    }
}

/// Inputs the caller passes on every interaction
#[derive(Debug, Clone, Copy)]
pub struct SelectorProps<'a> {
    pub thumbnails: &'a ThumbnailStrip,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

/// A proposed new time for one handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeChange {
    Start(f64),
    End(f64),
}

/// The controlled component's change callbacks
pub trait RangeChangeHandler {
    fn on_start_change(&mut self, time: f64);
    fn on_end_change(&mut self, time: f64);
}

impl RangeChange {
    /// Route the change to the matching callback
    pub fn dispatch(self, handler: &mut dyn RangeChangeHandler) {
        match self {
            RangeChange::Start(time) => handler.on_start_change(time),
            RangeChange::End(time) => handler.on_end_change(time),
        }
    }
}

/// Result of a pointer-down on a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDown {
    /// Suppress the host's native drag behaviour
    pub prevent_default: bool,
}

/// Render model for one thumbnail tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayout {
    pub index: usize,
    pub left_percent: f64,
    pub width_percent: f64,
}

/// Render model for one handle
#[derive(Debug, Clone, PartialEq)]
pub struct HandleLayout {
    pub handle: Handle,
    pub percent: f64,
    /// Left edge in timeline pixels, centred on `percent`
    pub left_px: f64,
    pub active: bool,
}

/// Everything needed to draw the selector
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub tiles: Vec<TileLayout>,
    pub start: HandleLayout,
    pub end: HandleLayout,
    pub band_left_percent: f64,
    pub band_width_percent: f64,
    pub start_label: String,
    pub end_label: String,
}

/// Timeline trimmer with start/end handles
#[derive(Debug, Default)]
pub struct RangeSelector {
    drag: DragState,
    geometry: TimelineGeometry,
}

impl RangeSelector {
    pub fn new(geometry: TimelineGeometry) -> Self {
        Self {
            drag: DragState::Idle,
            geometry,
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn geometry(&self) -> TimelineGeometry {
        self.geometry
    }

    /// Host reports the timeline's current bounding box
    pub fn set_geometry(&mut self, geometry: TimelineGeometry) {
        self.geometry = geometry;
    }

    /// Move/up listeners are live exactly while a handle is dragged
    pub fn listeners_installed(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// Begin dragging `handle`
    pub fn pointer_down(&mut self, handle: Handle) -> PointerDown {
        self.drag = match handle {
            Handle::Start => DragState::DraggingStart,
            Handle::End => DragState::DraggingEnd,
        };
        trace!(?handle, "Drag started");
        PointerDown {
            prevent_default: true,
        }
    }

    /// Translate a pointer move into a proposed handle time.
    ///
    /// `None` while idle, when the duration is unusable, or when the move
    /// would put a handle on or past the other one.
    pub fn pointer_move(&self, client_x: f64, props: &SelectorProps<'_>) -> Option<RangeChange> {
        let handle = self.drag.handle()?;
        let time = pointer_to_time(client_x, &self.geometry, props.duration)?;
        match handle {
            Handle::Start if time < props.end => Some(RangeChange::Start(time)),
            Handle::End if time > props.start => Some(RangeChange::End(time)),
            _ => None,
        }
    }

    /// End any drag
    pub fn pointer_up(&mut self) {
        if self.drag != DragState::Idle {
            trace!(state = ?self.drag, "Drag finished");
        }
        self.drag = DragState::Idle;
    }

    /// Drop listeners when the component goes away
    pub fn teardown(&mut self) {
        self.pointer_up();
    }

    /// Handle under a pointer-down at `client_x`; the end handle is on top
    pub fn hit_test(&self, client_x: f64, props: &SelectorProps<'_>) -> Option<Handle> {
        let start_x = self
            .geometry
            .percent_to_x(time_to_percent(props.start, props.duration));
        let end_x = self
            .geometry
            .percent_to_x(time_to_percent(props.end, props.duration));
        if (client_x - end_x).abs() <= HANDLE_HALF_WIDTH_PX {
            Some(Handle::End)
        } else if (client_x - start_x).abs() <= HANDLE_HALF_WIDTH_PX {
            Some(Handle::Start)
        } else {
            None
        }
    }

    /// Recompute the render model from the current props
    pub fn layout(&self, props: &SelectorProps<'_>) -> TimelineLayout {
        let start_percent = time_to_percent(props.start, props.duration);
        let end_percent = time_to_percent(props.end, props.duration).max(start_percent);

        let count = props.thumbnails.len();
        let tiles = props
            .thumbnails
            .iter()
            .map(|thumb| TileLayout {
                index: thumb.index,
                left_percent: thumb.index as f64 * 100.0 / count as f64,
                width_percent: 100.0 / count as f64,
            })
            .collect();

        TimelineLayout {
            tiles,
            start: self.handle_layout(Handle::Start, start_percent),
            end: self.handle_layout(Handle::End, end_percent),
            band_left_percent: start_percent,
            band_width_percent: end_percent - start_percent,
            start_label: TimeSpec::from_seconds(props.start).format_clock(),
            end_label: TimeSpec::from_seconds(props.end).format_clock(),
        }
    }

    fn handle_layout(&self, handle: Handle, percent: f64) -> HandleLayout {
        HandleLayout {
            handle,
            percent,
            left_px: percent / 100.0 * self.geometry.width - HANDLE_HALF_WIDTH_PX,
            active: self.drag.handle() == Some(handle),
        }
    }
}

impl Drop for RangeSelector {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(strip: &ThumbnailStrip, start: f64, end: f64, duration: f64) -> SelectorProps<'_> {
        SelectorProps {
            thumbnails: strip,
            start,
            end,
            duration,
        }
    }

    fn selector() -> RangeSelector {
        RangeSelector::new(TimelineGeometry::new(0.0, 300.0))
    }

    #[test]
    fn test_idle_ignores_moves() {
        let strip = ThumbnailStrip::default();
        let selector = selector();
        assert_eq!(selector.pointer_move(100.0, &props(&strip, 0.0, 30.0, 30.0)), None);
        assert!(!selector.listeners_installed());
    }

    #[test]
    fn test_drag_start_handle() {
        let strip = ThumbnailStrip::default();
        let mut selector = selector();
        let down = selector.pointer_down(Handle::Start);
        assert!(down.prevent_default);
        assert_eq!(selector.drag_state(), DragState::DraggingStart);
        assert!(selector.listeners_installed());

        let change = selector.pointer_move(100.0, &props(&strip, 0.0, 30.0, 30.0));
        assert_eq!(change, Some(RangeChange::Start(10.0)));
    }

    #[test]
    fn test_start_cannot_reach_end() {
        let strip = ThumbnailStrip::default();
        let mut selector = selector();
        selector.pointer_down(Handle::Start);
        let p = props(&strip, 5.0, 20.0, 30.0);
        assert_eq!(selector.pointer_move(200.0, &p), None);
        assert_eq!(selector.pointer_move(250.0, &p), None);
        assert_eq!(selector.pointer_move(190.0, &p), Some(RangeChange::Start(19.0)));
    }

    #[test]
    fn test_end_cannot_reach_start() {
        let strip = ThumbnailStrip::default();
        let mut selector = selector();
        selector.pointer_down(Handle::End);
        let p = props(&strip, 10.0, 30.0, 30.0);
        assert_eq!(selector.pointer_move(100.0, &p), None);
        assert_eq!(selector.pointer_move(0.0, &p), None);
        assert_eq!(selector.pointer_move(1000.0, &p), Some(RangeChange::End(30.0)));
    }

    #[test]
    fn test_pointer_up_from_any_state() {
        let mut selector = selector();
        selector.pointer_down(Handle::End);
        selector.pointer_up();
        assert_eq!(selector.drag_state(), DragState::Idle);
        selector.pointer_up();
        assert_eq!(selector.drag_state(), DragState::Idle);
        selector.pointer_down(Handle::Start);
        selector.teardown();
        assert!(!selector.listeners_installed());
    }

    #[test]
    fn test_zero_duration_is_guarded() {
        let strip = ThumbnailStrip::default();
        let mut selector = selector();
        selector.pointer_down(Handle::End);
        let p = props(&strip, 0.0, 0.0, 0.0);
        assert_eq!(selector.pointer_move(150.0, &p), None);

        let layout = selector.layout(&p);
        assert_eq!(layout.start.percent, 0.0);
        assert_eq!(layout.end.percent, 0.0);
        assert_eq!(layout.band_width_percent, 0.0);
        assert!(layout.band_left_percent.is_finite());
    }

    #[test]
    fn test_layout_positions() {
        let strip = ThumbnailStrip::default();
        let mut selector = selector();
        selector.pointer_down(Handle::Start);
        let layout = selector.layout(&props(&strip, 7.5, 22.5, 30.0));
        assert_eq!(layout.start.percent, 25.0);
        assert_eq!(layout.end.percent, 75.0);
        assert_eq!(layout.start.left_px, 75.0 - HANDLE_HALF_WIDTH_PX);
        assert_eq!(layout.band_left_percent, 25.0);
        assert_eq!(layout.band_width_percent, 50.0);
        assert!(layout.start.active);
        assert!(!layout.end.active);
        assert_eq!(layout.start_label, "00:00:07");
        assert_eq!(layout.end_label, "00:00:22");
    }

    #[test]
    fn test_hit_test() {
        let strip = ThumbnailStrip::default();
        let selector = selector();
        let p = props(&strip, 0.0, 30.0, 30.0);
        assert_eq!(selector.hit_test(4.0, &p), Some(Handle::Start));
        assert_eq!(selector.hit_test(295.0, &p), Some(Handle::End));
        assert_eq!(selector.hit_test(150.0, &p), None);

        let overlapping = props(&strip, 10.0, 10.2, 30.0);
        assert_eq!(selector.hit_test(101.0, &overlapping), Some(Handle::End));
    }

    #[derive(Default)]
    struct Recorder {
        starts: Vec<f64>,
        ends: Vec<f64>,
    }

    impl RangeChangeHandler for Recorder {
        fn on_start_change(&mut self, time: f64) {
            self.starts.push(time);
        }

        fn on_end_change(&mut self, time: f64) {
            self.ends.push(time);
        }
    }

    #[test]
    fn test_dispatch_routes_callbacks() {
        let mut recorder = Recorder::default();
        RangeChange::Start(3.0).dispatch(&mut recorder);
        RangeChange::End(9.0).dispatch(&mut recorder);
        assert_eq!(recorder.starts, vec![3.0]);
        assert_eq!(recorder.ends, vec![9.0]);
    }
}
