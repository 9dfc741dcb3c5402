//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::audio::{AudioFormat, DEFAULT_SAMPLE_RATE};
use crate::domain::error::PolicyError;
use crate::domain::recording::{guide, Duration, DurationPolicy};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub min_duration: Option<String>,
    pub max_duration: Option<String>,
    pub countdown_window: Option<String>,
    pub format: Option<String>,
    pub sample_rate: Option<u32>,
    pub output_dir: Option<String>,
    pub passage: Option<String>,
    pub playback: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            min_duration: Some(Duration::default_min().to_string()),
            max_duration: Some(Duration::default_max().to_string()),
            countdown_window: Some(Duration::default_countdown_window().to_string()),
            format: Some(AudioFormat::default().to_string()),
            sample_rate: Some(DEFAULT_SAMPLE_RATE),
            output_dir: Some(".".to_string()),
            passage: None,
            playback: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            min_duration: other.min_duration.or(self.min_duration),
            max_duration: other.max_duration.or(self.max_duration),
            countdown_window: other.countdown_window.or(self.countdown_window),
            format: other.format.or(self.format),
            sample_rate: other.sample_rate.or(self.sample_rate),
            output_dir: other.output_dir.or(self.output_dir),
            passage: other.passage.or(self.passage),
            playback: other.playback.or(self.playback),
        }
    }

    pub fn min_duration_or_default(&self) -> Duration {
        parse_or(self.min_duration.as_deref(), Duration::default_min())
    }

    pub fn max_duration_or_default(&self) -> Duration {
        parse_or(self.max_duration.as_deref(), Duration::default_max())
    }

    pub fn countdown_window_or_default(&self) -> Duration {
        parse_or(
            self.countdown_window.as_deref(),
            Duration::default_countdown_window(),
        )
    }

    pub fn format_or_default(&self) -> AudioFormat {
        self.format
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn sample_rate_or_default(&self) -> u32 {
        self.sample_rate
            .filter(|&rate| rate > 0)
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    pub fn output_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.output_dir.as_deref().unwrap_or("."))
    }

    pub fn passage_or_default(&self) -> &str {
        self.passage.as_deref().unwrap_or(guide::DEFAULT_PASSAGE)
    }

    pub fn playback_or_default(&self) -> bool {
        self.playback.unwrap_or(true)
    }

    /// Build the duration policy from the three limits
    pub fn policy(&self) -> Result<DurationPolicy, PolicyError> {
        DurationPolicy::new(
            self.min_duration_or_default(),
            self.max_duration_or_default(),
            self.countdown_window_or_default(),
        )
    }
}

fn parse_or(value: Option<&str>, default: Duration) -> Duration {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.min_duration, Some("11s".to_string()));
        assert_eq!(config.max_duration, Some("59s".to_string()));
        assert_eq!(config.countdown_window, Some("10s".to_string()));
        assert_eq!(config.format, Some("wav".to_string()));
        assert_eq!(config.sample_rate, Some(48_000));
        assert_eq!(config.playback, Some(true));
        assert!(config.passage.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.min_duration.is_none());
        assert!(config.max_duration.is_none());
        assert!(config.format.is_none());
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            min_duration: Some("11s".to_string()),
            max_duration: Some("59s".to_string()),
            format: Some("wav".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            min_duration: Some("16s".to_string()),
            max_duration: None,
            format: Some("flac".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.min_duration, Some("16s".to_string()));
        assert_eq!(merged.max_duration, Some("59s".to_string()));
        assert_eq!(merged.format_or_default(), AudioFormat::Flac);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AppConfig {
            min_duration: Some("soon".to_string()),
            format: Some("mp3".to_string()),
            sample_rate: Some(0),
            ..Default::default()
        };
        assert_eq!(config.min_duration_or_default().as_secs(), 11);
        assert_eq!(config.format_or_default(), AudioFormat::Wav);
        assert_eq!(config.sample_rate_or_default(), 48_000);
    }

    #[test]
    fn policy_from_config() {
        let config = AppConfig {
            min_duration: Some("16s".to_string()),
            max_duration: Some("59s".to_string()),
            ..Default::default()
        };
        let policy = config.policy().unwrap();
        assert_eq!(policy.min_duration(), 16);
        assert_eq!(policy.max_duration(), 59);
        assert_eq!(policy.countdown_window(), 10);
    }

    #[test]
    fn policy_rejects_inverted_limits() {
        let config = AppConfig {
            min_duration: Some("1m".to_string()),
            max_duration: Some("30s".to_string()),
            ..Default::default()
        };
        assert!(config.policy().is_err());
    }

    #[test]
    fn passage_and_output_dir_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.passage_or_default(), guide::DEFAULT_PASSAGE);
        assert_eq!(config.output_dir_or_default(), PathBuf::from("."));
        assert!(config.playback_or_default());
    }
}
