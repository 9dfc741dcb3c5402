//! Rodio-based playback adapter
//!
//! Decodes the encoded sample in memory and plays it on the default output
//! device. The output stream is dropped when playback ends, or as soon as
//! the `play` future is dropped.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{AudioPlayer, PlaybackError};
use crate::domain::audio::AudioBlob;

/// How often the playback thread checks whether it was cancelled
const PLAYBACK_POLL: Duration = Duration::from_millis(20);

/// Raises the flag when dropped
struct StopOnDrop(Arc<AtomicBool>);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Player using rodio
pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn play(&self, blob: &AudioBlob) -> Result<(), PlaybackError> {
        if blob.is_empty() {
            return Err(PlaybackError::Decode("sample is empty".into()));
        }

        let data = blob.data().to_vec();
        let stop = Arc::new(AtomicBool::new(false));
        let _stop_on_drop = StopOnDrop(Arc::clone(&stop));
        tokio::task::spawn_blocking(move || play_sync(data, &stop))
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Play to completion or until `stop` is raised (called from spawn_blocking)
fn play_sync(data: Vec<u8>, stop: &AtomicBool) -> Result<(), PlaybackError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

    let source = Decoder::new(Cursor::new(data)).map_err(|e| PlaybackError::Decode(e.to_string()))?;
    sink.append(source);
    while !sink.empty() {
        if stop.load(Ordering::SeqCst) {
            sink.stop();
            tracing::debug!("playback cancelled");
            return Ok(());
        }
        std::thread::sleep(PLAYBACK_POLL);
    }

    tracing::debug!("playback finished");
    Ok(())
}
