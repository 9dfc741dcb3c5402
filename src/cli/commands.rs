//! Interactive recorder commands read from stdin

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A line command for the interactive recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    Start,
    Pause,
    Resume,
    Reset,
    Stop,
    Publish,
    Play,
    Status,
    Help,
    Quit,
}

impl RecorderCommand {
    pub const ALL: [RecorderCommand; 10] = [
        Self::Start,
        Self::Pause,
        Self::Resume,
        Self::Reset,
        Self::Stop,
        Self::Publish,
        Self::Play,
        Self::Status,
        Self::Help,
        Self::Quit,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reset => "reset",
            Self::Stop => "stop",
            Self::Publish => "publish",
            Self::Play => "play",
            Self::Status => "status",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Start => "Start a new recording",
            Self::Pause => "Pause the recording",
            Self::Resume => "Resume a paused recording",
            Self::Reset => "Discard the current take and record again",
            Self::Stop => "Stop recording and keep the take for playback",
            Self::Publish => "Stop recording and save the sample",
            Self::Play => "Play the last take",
            Self::Status => "Show the recorder state",
            Self::Help => "Show this list",
            Self::Quit => "Release the microphone and exit",
        }
    }
}

impl fmt::Display for RecorderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Unrecognised input line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown command: \"{0}\". Type 'help' for the list of commands")]
pub struct UnknownCommand(pub String);

impl FromStr for RecorderCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let command = match input.as_str() {
            "r" | "record" => Self::Start,
            "p" => Self::Pause,
            "c" | "continue" => Self::Resume,
            "u" | "upload" => Self::Publish,
            "?" | "h" => Self::Help,
            "q" | "exit" => Self::Quit,
            other => Self::ALL
                .into_iter()
                .find(|c| c.name() == other)
                .ok_or_else(|| UnknownCommand(s.trim().to_string()))?,
        };
        Ok(command)
    }
}
