//! Duration value object
//!
//! Recording limits are whole seconds; the elapsed counter ticks once per
//! second, so sub-second precision is never needed.

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Minimum publishable length (seconds)
pub const DEFAULT_MIN_DURATION_SECS: u32 = 11;

/// Forced stop length (seconds)
pub const DEFAULT_MAX_DURATION_SECS: u32 = 59;

/// Countdown warning window before the forced stop (seconds)
pub const DEFAULT_COUNTDOWN_WINDOW_SECS: u32 = 10;

/// Whole-second duration parsed from strings like `59s`, `1m` or `1m30s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    seconds: u32,
}

impl Duration {
    pub const fn from_secs(seconds: u32) -> Self {
        Self { seconds }
    }

    pub const fn default_min() -> Self {
        Self::from_secs(DEFAULT_MIN_DURATION_SECS)
    }

    pub const fn default_max() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    pub const fn default_countdown_window() -> Self {
        Self::from_secs(DEFAULT_COUNTDOWN_WINDOW_SECS)
    }

    pub const fn as_secs(&self) -> u32 {
        self.seconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.seconds as u64)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse `"<n>s"`, `"<n>m"` or `"<n>m<n>s"`. `"0s"` is accepted so a
    /// zero minimum or countdown window can be configured.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || DurationParseError {
            input: s.to_string(),
        };

        let mut minutes: u32 = 0;
        let mut seconds: u32 = 0;
        let mut digits = String::new();
        let mut seen_minutes = false;
        let mut seen_seconds = false;

        for ch in input.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                'm' if !digits.is_empty() && !seen_minutes && !seen_seconds => {
                    minutes = digits.parse().map_err(|_| err())?;
                    digits.clear();
                    seen_minutes = true;
                }
                's' if !digits.is_empty() && !seen_seconds => {
                    seconds = digits.parse().map_err(|_| err())?;
                    digits.clear();
                    seen_seconds = true;
                }
                _ => return Err(err()),
            }
        }

        if !digits.is_empty() || !(seen_minutes || seen_seconds) {
            return Err(err());
        }

        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .map(Self::from_secs)
            .ok_or_else(err)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.seconds / 60;
        let seconds = self.seconds % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}
