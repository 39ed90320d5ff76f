// Tracing log adapter - Structured logging using tracing crate

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::ports::*;

/// Tracing log adapter
///
/// Subscriber setup lives in `utils::logging`; this adapter only applies its
/// own minimum level on top of the subscriber's filter.
pub struct TracingLogAdapter {
    min_level: LogLevel,
    target: &'static str,
}

impl TracingLogAdapter {
    /// Create new tracing log adapter
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            target: "editor",
        }
    }

    /// Tag every message with a component name
    pub fn with_target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    /// Check if log level should be logged
    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Default for TracingLogAdapter {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        if self.should_log(LogLevel::Info) {
            info!(component = self.target, "{}", message);
        }
    }

    async fn warn(&self, message: &str) {
        if self.should_log(LogLevel::Warn) {
            warn!(component = self.target, "{}", message);
        }
    }

    async fn error(&self, message: &str) {
        if self.should_log(LogLevel::Error) {
            error!(component = self.target, "{}", message);
        }
    }

    async fn debug(&self, message: &str) {
        if self.should_log(LogLevel::Debug) {
            debug!(component = self.target, "{}", message);
        }
    }
}
