// Application layer - Editor session and its collaborators

pub mod config;
pub mod container;
pub mod editor;
pub mod progress;
pub mod sampler;
pub mod selector;

pub use config::EditorConfig;
pub use editor::{EditorSession, TrimOutcome};
pub use sampler::ThumbnailSampler;
pub use selector::RangeSelector;
