//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::audio::AudioFormat;
use crate::domain::config::AppConfig;
use crate::domain::recording::DurationPolicy;

/// Voice sampler - record a reading of a passage as a voice sample
#[derive(Parser, Debug)]
#[command(name = "voice-sampler")]
#[command(version)]
#[command(about = "Record, review and publish a short voice sample")]
#[command(long_about = None)]
pub struct Cli {
    /// Shortest recording that may be published (e.g., 11s, 1m)
    #[arg(long, value_name = "TIME")]
    pub min_duration: Option<String>,

    /// Recording stops automatically at this length (e.g., 59s, 1m30s)
    #[arg(long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Warning window before the maximum duration
    #[arg(long, value_name = "TIME")]
    pub countdown_window: Option<String>,

    /// Container for the encoded sample
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Sample rate of the encoded sample in Hz
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Directory published samples are written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Disable playback of published samples
    #[arg(long)]
    pub no_playback: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The config layer given on the command line
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            min_duration: self.min_duration.clone(),
            max_duration: self.max_duration.clone(),
            countdown_window: self.countdown_window.clone(),
            format: self.format.map(|f| AudioFormat::from(f).to_string()),
            sample_rate: self.sample_rate,
            output_dir: self
                .output
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            passage: None,
            playback: if self.no_playback { Some(false) } else { None },
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Format argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Wav,
    Flac,
}

impl From<FormatArg> for AudioFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Wav => AudioFormat::Wav,
            FormatArg::Flac => AudioFormat::Flac,
        }
    }
}

/// Resolved options for the interactive recorder
#[derive(Debug, Clone)]
pub struct RecorderOptions {
    pub policy: DurationPolicy,
    pub format: AudioFormat,
    pub sample_rate: u32,
    pub output_dir: PathBuf,
    pub passage: String,
    pub playback: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "min_duration",
    "max_duration",
    "countdown_window",
    "format",
    "sample_rate",
    "output_dir",
    "passage",
    "playback",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
