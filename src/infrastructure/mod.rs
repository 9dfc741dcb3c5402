//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: microphone capture
//! through cpal, encoding, the filesystem sink, rodio playback and the
//! TOML config store.

pub mod capture;
pub mod config;
pub mod playback;
pub mod sink;

pub use capture::CpalCaptureSession;
pub use config::XdgConfigStore;
pub use playback::{create_player, NoOpPlayer, RodioPlayer};
pub use sink::FileSink;
