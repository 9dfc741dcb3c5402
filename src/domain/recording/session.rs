//! Recording session state machine

use std::fmt;
use thiserror::Error;

use super::guide;

/// Recording states. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordingStatus {
    #[default]
    Idle,
    Recording,
    Paused,
    Uploading,
    Success,
    Fail,
}

impl RecordingStatus {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Uploading => "uploading",
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }

    /// Whether the capture device is held in this state
    pub const fn holds_capture(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }

    /// Validate `op` against the current state and return the target state.
    ///
    /// State machine:
    ///   IDLE | FAIL | SUCCESS -> RECORDING (start)
    ///   RECORDING | PAUSED    -> IDLE      (stop)
    ///   RECORDING             -> PAUSED    (pause)
    ///   PAUSED                -> RECORDING (resume)
    ///   RECORDING | PAUSED    -> UPLOADING (publish)
    ///   RECORDING             -> FAIL      (timeout)
    ///   UPLOADING             -> SUCCESS   (complete upload)
    ///   UPLOADING             -> FAIL      (upload failed)
    pub fn transition(self, op: Operation) -> Result<RecordingStatus, InvalidStateTransition> {
        use Operation::*;
        use RecordingStatus::*;

        let next = match (self, op) {
            (Idle | Fail | Success, Start) => Recording,
            (Recording | Paused, Stop) => Idle,
            (Recording, Pause) => Paused,
            (Paused, Resume) => Recording,
            (Recording | Paused, Publish) => Uploading,
            (Recording, Timeout) => Fail,
            (Uploading, CompleteUpload) => Success,
            (Uploading, FailUpload) => Fail,
            (current_state, action) => {
                return Err(InvalidStateTransition {
                    current_state,
                    action,
                })
            }
        };
        Ok(next)
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operations that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Start,
    Stop,
    Pause,
    Resume,
    Publish,
    Timeout,
    CompleteUpload,
    FailUpload,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start recording",
            Self::Stop => "stop recording",
            Self::Pause => "pause recording",
            Self::Resume => "resume recording",
            Self::Publish => "publish recording",
            Self::Timeout => "time out recording",
            Self::CompleteUpload => "complete upload",
            Self::FailUpload => "fail upload",
        };
        f.write_str(s)
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: RecordingStatus,
    pub action: Operation,
}

/// Data of one recording attempt as seen by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSession {
    status: RecordingStatus,
    elapsed_seconds: u32,
    guide_text: String,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            status: RecordingStatus::Idle,
            elapsed_seconds: 0,
            guide_text: guide::DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn guide_text(&self) -> &str {
        &self.guide_text
    }

    /// Apply `op`, moving to the state it leads to.
    pub fn apply(&mut self, op: Operation) -> Result<RecordingStatus, InvalidStateTransition> {
        self.status = self.status.transition(op)?;
        Ok(self.status)
    }

    /// Check `op` without changing state.
    pub fn check(&self, op: Operation) -> Result<RecordingStatus, InvalidStateTransition> {
        self.status.transition(op)
    }

    /// Force `Fail` with a message. Used for failures that can strike from
    /// any state once the capture has been released.
    pub fn fail(&mut self, message: &str) {
        self.status = RecordingStatus::Fail;
        self.set_guide(message);
    }

    /// Back to idle with the default prompt and a zero counter.
    pub fn reset(&mut self) {
        self.status = RecordingStatus::Idle;
        self.elapsed_seconds = 0;
        self.set_guide(guide::DEFAULT_PROMPT);
    }

    pub fn set_guide(&mut self, message: &str) {
        self.guide_text = message.to_string();
    }

    /// Count one second. Only counts while recording; returns the new value.
    pub fn tick(&mut self) -> u32 {
        if self.status == RecordingStatus::Recording {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
        self.elapsed_seconds
    }

    pub fn reset_elapsed(&mut self) {
        self.elapsed_seconds = 0;
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}
