//! Sample sink port interface

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::audio::AudioBlob;

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to store sample: {0}")]
    WriteFailed(String),

    #[error("Refusing to store an empty sample")]
    EmptySample,
}

/// Port for the downstream consumer of a published sample.
#[async_trait]
pub trait SampleSink: Send + Sync {
    /// Store `blob` under `file_name`, returning where it went.
    async fn store(&self, blob: &AudioBlob, file_name: &str) -> Result<PathBuf, SinkError>;
}
