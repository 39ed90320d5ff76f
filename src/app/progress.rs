//! Session observers - status and progress fan-out for front ends

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::domain::model::*;

/// Receives every visible change of an editor session
pub trait SessionObserver: Send + Sync {
    /// Status line changed
    fn on_status(&self, status: &Status);

    /// Thumbnail strip grew or was replaced
    fn on_thumbnails(&self, _strip: &ThumbnailStrip) {}

    /// Selection range changed; `None` when cleared
    fn on_range(&self, _range: Option<&SelectionRange>) {}

    /// Output clip produced, or `None` when the previous one was invalidated
    fn on_output(&self, _output: Option<&OutputClip>) {}
}

/// Ordered set of observers
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Arc<Mutex<Vec<Arc<dyn SessionObserver>>>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer
    pub fn add(&self, observer: Arc<dyn SessionObserver>) {
        match self.observers.lock() {
            Ok(mut observers) => observers.push(observer),
            Err(_) => warn!("Observer list poisoned, observer not registered"),
        }
    }

    pub fn len(&self) -> usize {
        self.observers.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify all observers
    pub fn notify<F>(&self, f: F)
    where
        F: Fn(&dyn SessionObserver),
    {
        match self.observers.lock() {
            Ok(observers) => {
                for observer in observers.iter() {
                    f(observer.as_ref());
                }
            }
            Err(_) => warn!("Observer list poisoned, notification dropped"),
        }
    }
}

/// Console observer for CLI usage
pub struct ConsoleObserver {
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn progress_bar(done: usize, total: usize) -> String {
        let bar_length = 20;
        let filled = if total == 0 {
            0
        } else {
            (done * bar_length / total).min(bar_length)
        };
        "#".repeat(filled) + &"-".repeat(bar_length - filled)
    }
}

impl SessionObserver for ConsoleObserver {
    fn on_status(&self, status: &Status) {
        println!("[{:?}] {}", status.phase, status.message);
    }

    fn on_thumbnails(&self, strip: &ThumbnailStrip) {
        if self.verbose && strip.expected() > 0 {
            println!(
                "Thumbnails [{}] {}/{}",
                Self::progress_bar(strip.len(), strip.expected()),
                strip.len(),
                strip.expected()
            );
        }
    }

    fn on_range(&self, range: Option<&SelectionRange>) {
        if !self.verbose {
            return;
        }
        if let Some(range) = range {
            println!(
                "Range: {} - {}",
                TimeSpec::from_seconds(range.start()),
                TimeSpec::from_seconds(range.end())
            );
        }
    }

    fn on_output(&self, output: Option<&OutputClip>) {
        if let Some(output) = output {
            println!(
                "Output ready: {} ({} bytes, {})",
                output.download_name,
                output.len(),
                output.mime
            );
        }
    }
}

/// JSON observer for structured output, one event per line
pub struct JsonObserver;

impl JsonObserver {
    fn emit(event: serde_json::Value) {
        println!("{}", event);
    }
}

impl SessionObserver for JsonObserver {
    fn on_status(&self, status: &Status) {
        Self::emit(serde_json::json!({
            "event": "status",
            "phase": status.phase,
            "message": status.message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_thumbnails(&self, strip: &ThumbnailStrip) {
        Self::emit(serde_json::json!({
            "event": "thumbnails",
            "captured": strip.len(),
            "expected": strip.expected(),
            "timestamps": strip.timestamps(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_range(&self, range: Option<&SelectionRange>) {
        Self::emit(serde_json::json!({
            "event": "range",
            "start": range.map(|r| r.start()),
            "end": range.map(|r| r.end()),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn on_output(&self, output: Option<&OutputClip>) {
        let event = match output {
            Some(output) => serde_json::json!({
                "event": "output",
                "download_name": output.download_name,
                "bytes": output.len(),
                "mime": output.mime,
                "timestamp": output.created_at.to_rfc3339()
            }),
            None => serde_json::json!({
                "event": "output_cleared",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }),
        };
        Self::emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingObserver {
        statuses: AtomicUsize,
        ranges: AtomicUsize,
    }

    impl SessionObserver for CountingObserver {
        fn on_status(&self, _status: &Status) {
            self.statuses.fetch_add(1, Ordering::Relaxed);
        }

        fn on_range(&self, _range: Option<&SelectionRange>) {
            self.ranges.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_notify_reaches_every_observer() {
        let set = ObserverSet::new();
        let first = Arc::new(CountingObserver::default());
        let second = Arc::new(CountingObserver::default());
        set.add(first.clone());
        set.add(second.clone());
        assert_eq!(set.len(), 2);

        let status = Status::new(TrimPhase::Ready, "ready");
        set.notify(|o| o.on_status(&status));
        set.notify(|o| o.on_range(None));
        // default method, no counter
        set.notify(|o| o.on_thumbnails(&ThumbnailStrip::default()));

        assert_eq!(first.statuses.load(Ordering::Relaxed), 1);
        assert_eq!(second.statuses.load(Ordering::Relaxed), 1);
        assert_eq!(first.ranges.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_poisoned_set_skips_observers() {
        let set = ObserverSet::new();
        let inner = set.observers.clone();
        let _ = std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("poison");
        })
        .join();

        set.add(Arc::new(CountingObserver::default()));
        set.notify(|o| o.on_range(None));
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(ConsoleObserver::progress_bar(0, 15), "-".repeat(20));
        assert_eq!(ConsoleObserver::progress_bar(15, 15), "#".repeat(20));
        assert_eq!(ConsoleObserver::progress_bar(3, 0), "-".repeat(20));
    }
}
