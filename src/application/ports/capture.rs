//! Capture session port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioBlob;

/// Capture errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// No capture capability, or access to the microphone was refused
    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("Cannot {action} capture while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("Failed to encode captured audio: {0}")]
    EncodeFailure(String),

    #[error("Capture device error: {0}")]
    Device(String),
}

/// Port for microphone capture.
///
/// One session holds the microphone from `start` until `stop`. Every
/// method takes `&mut self`: a session has exactly one owner.
#[async_trait]
pub trait CaptureSession: Send {
    /// Acquire the microphone and begin buffering audio.
    ///
    /// # Errors
    /// `PermissionDenied` when there is no capture capability or access is
    /// refused; `InvalidState` when already capturing.
    async fn start(&mut self) -> Result<(), CaptureError>;

    /// Suspend buffering without releasing the device.
    fn pause(&mut self) -> Result<(), CaptureError>;

    /// Resume buffering after `pause`.
    fn resume(&mut self) -> Result<(), CaptureError>;

    /// Release the device and encode everything buffered so far.
    ///
    /// Safe from both capturing and paused. Without a prior `start`, or with
    /// nothing captured, returns an empty blob.
    async fn stop(&mut self) -> Result<AudioBlob, CaptureError>;

    /// Whether the microphone is currently held
    fn is_active(&self) -> bool;
}
