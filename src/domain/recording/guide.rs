//! Guide text shown to the user alongside the recording status

/// Idle / recording prompt
pub const DEFAULT_PROMPT: &str = "Please read the passage below in a natural voice";

pub const PAUSED_PROMPT: &str = "Recording paused. Resume when you are ready";

pub const TIMEOUT: &str = "Recording timed out, please record again";

pub const TOO_SHORT: &str = "Recording too short, please record again";

pub const RECORDING_FAILED: &str = "Recording failed, please record again";

pub const UPLOADING: &str = "Uploading your voice sample...";

pub const UPLOAD_COMPLETE: &str = "Voice sample uploaded";

pub const UPLOAD_FAILED: &str = "Upload failed, please record again";

pub const PERMISSION_DENIED: &str =
    "Microphone access was denied. Enable microphone permission and try again";

/// Passage read aloud during recording
pub const DEFAULT_PASSAGE: &str = "Hey, did you know? The streets are especially busy today, \
several times livelier than usual. Everyone is out shopping and eating, and every corner is \
full of laughter. I got pulled into the lively atmosphere too, and it feels really good!";
