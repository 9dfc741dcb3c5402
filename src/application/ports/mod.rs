//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod playback;
pub mod sink;

// Re-export common types
pub use capture::{CaptureError, CaptureSession};
pub use config::ConfigStore;
pub use playback::{AudioPlayer, PlaybackError};
pub use sink::{SampleSink, SinkError};
