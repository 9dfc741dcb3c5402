//! Domain layer - Core business logic
//!
//! Contains value objects, the recording state machine, and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod recording;

// Re-export common types
pub use audio::{AudioBlob, AudioFormat};
pub use config::AppConfig;
pub use error::*;
pub use recording::{
    Duration, DurationPolicy, InvalidStateTransition, Operation, RecordingSession,
    RecordingStatus,
};
