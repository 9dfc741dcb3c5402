//! Playback port for listening back to a published sample

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioBlob;

/// Errors that can occur during playback
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Unsupported audio data: {0}")]
    Decode(String),
}

/// Port trait for sample playback
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play the blob to completion. Output resources are released before
    /// this returns.
    async fn play(&self, blob: &AudioBlob) -> Result<(), PlaybackError>;
}
