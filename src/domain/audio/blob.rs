//! Encoded audio blob value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidFormatError;

/// Output sample rate of every encoded blob
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Upload file name without extension
pub const UPLOAD_FILE_STEM: &str = "speech";

/// Supported output containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioFormat {
    #[default]
    Wav,
    Flac,
}

impl AudioFormat {
    /// Get the MIME type string
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for AudioFormat {
    type Err = InvalidFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "flac" => Ok(Self::Flac),
            _ => Err(InvalidFormatError {
                input: s.to_string(),
            }),
        }
    }
}

/// The finalized recording: encoded bytes plus container and rate.
///
/// An empty blob means nothing was captured; callers treat it as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    data: Vec<u8>,
    format: AudioFormat,
    sample_rate: u32,
}

impl AudioBlob {
    pub fn new(data: Vec<u8>, format: AudioFormat, sample_rate: u32) -> Self {
        Self {
            data,
            format,
            sample_rate,
        }
    }

    /// A blob with no audio in it
    pub fn empty(format: AudioFormat) -> Self {
        Self::new(Vec::new(), format, DEFAULT_SAMPLE_RATE)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// File name the upload pipeline expects, e.g. `speech.wav`
    pub fn file_name(&self) -> String {
        format!("{}.{}", UPLOAD_FILE_STEM, self.format.extension())
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
