//! CLI layer - Command-line interface
//!
//! Contains argument parsing, the interactive recorder loop, config
//! subcommands and output formatting.

pub mod app;
pub mod args;
pub mod commands;
pub mod config_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{run_recorder, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, RecorderOptions};
pub use commands::RecorderCommand;
pub use presenter::Presenter;
