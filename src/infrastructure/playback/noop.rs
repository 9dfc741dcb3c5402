//! No-op player
//!
//! Used when playback is disabled.

use async_trait::async_trait;

use crate::application::ports::{AudioPlayer, PlaybackError};
use crate::domain::audio::AudioBlob;

/// Player that discards the sample
pub struct NoOpPlayer;

impl NoOpPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for NoOpPlayer {
    async fn play(&self, _blob: &AudioBlob) -> Result<(), PlaybackError> {
        Ok(())
    }
}
