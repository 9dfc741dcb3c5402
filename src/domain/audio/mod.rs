//! Audio artifact domain module

mod blob;

pub use blob::{AudioBlob, AudioFormat, DEFAULT_SAMPLE_RATE, UPLOAD_FILE_STEM};
