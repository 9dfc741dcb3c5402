//! Voice sampler - guided voice-sample recording
//!
//! This crate records a short reading of a passage from the microphone,
//! enforcing minimum and maximum durations, and hands the encoded sample
//! to a downstream sink.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recording state machine, duration policy, audio blob and config
//! - **Application**: Recording controller, tick timer and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal capture, encoders, file sink, rodio)
//! - **CLI**: Argument parsing, interactive recorder loop and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
