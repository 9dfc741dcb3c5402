//! Filesystem sample sink
//!
//! Writes each published sample into an output directory. An existing file
//! with the same name is replaced, so the directory always holds the latest
//! take.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{SampleSink, SinkError};
use crate::domain::audio::AudioBlob;

/// Sink that stores samples under a directory
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SampleSink for FileSink {
    async fn store(&self, blob: &AudioBlob, file_name: &str) -> Result<PathBuf, SinkError> {
        if blob.is_empty() {
            return Err(SinkError::EmptySample);
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SinkError::WriteFailed(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.dir.join(file_name);
        fs::write(&path, blob.data())
            .await
            .map_err(|e| SinkError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), bytes = blob.size_bytes(), "sample stored");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::AudioFormat;

    fn blob() -> AudioBlob {
        AudioBlob::new(vec![1, 2, 3, 4], AudioFormat::Wav, 48_000)
    }

    #[tokio::test]
    async fn stores_under_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        let path = sink.store(&blob(), "speech.wav").await.unwrap();

        assert_eq!(path, dir.path().join("speech.wav"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("samples").join("today");
        let sink = FileSink::new(&nested);

        let path = sink.store(&blob(), "speech.wav").await.unwrap();
        assert!(path.exists());
        assert_eq!(sink.dir(), nested.as_path());
    }

    #[tokio::test]
    async fn replaces_previous_take() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        sink.store(&blob(), "speech.wav").await.unwrap();
        let second = AudioBlob::new(vec![9, 9], AudioFormat::Wav, 48_000);
        let path = sink.store(&second, "speech.wav").await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), vec![9, 9]);
    }

    #[tokio::test]
    async fn rejects_empty_blob() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        let result = sink.store(&AudioBlob::empty(AudioFormat::Wav), "speech.wav").await;
        assert!(matches!(result, Err(SinkError::EmptySample)));
        assert!(!dir.path().join("speech.wav").exists());
    }
}
