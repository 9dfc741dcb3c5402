//! Playback adapters
//!
//! Lets the speaker listen back to a published sample.

mod noop;
mod rodio;

pub use noop::NoOpPlayer;
pub use self::rodio::RodioPlayer;

use crate::application::ports::AudioPlayer;

/// Create a player based on whether playback is enabled
pub fn create_player(enabled: bool) -> Box<dyn AudioPlayer> {
    if enabled {
        Box::new(RodioPlayer::new())
    } else {
        Box::new(NoOpPlayer::new())
    }
}
