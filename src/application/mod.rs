//! Application layer - Use cases and port interfaces
//!
//! Contains the recording controller, its tick timer, and trait
//! definitions for external system interactions.

pub mod controller;
pub mod ports;
pub mod timer;

// Re-export use cases
pub use controller::{
    ControllerError, PublishedSample, RecordingController, SessionSnapshot, TickOutcome,
    TICK_PERIOD,
};
pub use timer::{Tick, TickTimer};
