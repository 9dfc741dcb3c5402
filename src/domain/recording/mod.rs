//! Recording domain module

mod duration;
pub mod guide;
mod policy;
mod session;

pub use duration::{
    Duration, DEFAULT_COUNTDOWN_WINDOW_SECS, DEFAULT_MAX_DURATION_SECS, DEFAULT_MIN_DURATION_SECS,
};
pub use policy::DurationPolicy;
pub use session::{InvalidStateTransition, Operation, RecordingSession, RecordingStatus};
