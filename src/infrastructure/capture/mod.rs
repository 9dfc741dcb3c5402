//! Microphone capture adapters

mod cpal_capture;
pub mod encoder;

pub use cpal_capture::CpalCaptureSession;
pub use encoder::EncodingError;
