//! CLI presenter for output formatting

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::SessionSnapshot;
use crate::domain::recording::DurationPolicy;

use super::commands::RecorderCommand;

const BAR_WIDTH: usize = 20;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    /// A `\r`-redrawn progress line is on screen without a trailing newline
    progress_active: AtomicBool,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            spinner: None,
            progress_active: AtomicBool::new(false),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        self.end_progress();
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    pub fn spinner_success(&mut self, message: &str) {
        self.finish_spinner(format!("{} {}", "✓".green(), message));
    }

    pub fn spinner_fail(&mut self, message: &str) {
        self.finish_spinner(format!("{} {}", "✗".red(), message));
    }

    /// Finish the spinner with a final line. indicatif draws nothing when
    /// stderr is not a terminal, so the line is printed directly then.
    fn finish_spinner(&mut self, line: String) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => spinner.finish_with_message(line),
            Some(spinner) => {
                spinner.finish_and_clear();
                eprintln!("{}", line);
            }
            None => eprintln!("{}", line),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.end_progress();
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.end_progress();
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.end_progress();
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.end_progress();
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (config list, status)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Show the guide line for the current state
    pub fn guide(&self, text: &str) {
        self.end_progress();
        eprintln!("{} {}", "»".cyan(), text.bold());
    }

    /// Show the passage to be read aloud
    pub fn passage(&self, text: &str) {
        self.end_progress();
        eprintln!();
        eprintln!("{}", "Read aloud:".bold());
        eprintln!("  {}", text.italic());
        eprintln!();
    }

    pub fn help(&self) {
        self.end_progress();
        eprintln!("{}", "Commands:".bold());
        for command in RecorderCommand::ALL {
            eprintln!("  {:<8} {}", command.name().cyan(), command.description());
        }
    }

    /// Format recording progress bar
    pub fn format_progress(&self, elapsed_secs: u32, max_secs: u32) -> String {
        let ratio = if max_secs > 0 {
            (elapsed_secs as f64 / max_secs as f64).min(1.0)
        } else {
            0.0
        };

        let filled = (ratio * BAR_WIDTH as f64) as usize;
        let empty = BAR_WIDTH - filled;

        format!(
            "[{}{}] {:>3}s / {}s",
            "█".repeat(filled).cyan(),
            "░".repeat(empty),
            elapsed_secs,
            max_secs
        )
    }

    /// Redraw the progress line in place
    pub fn progress(&self, snapshot: &SessionSnapshot, policy: &DurationPolicy) {
        let mut line = self.format_progress(snapshot.elapsed_seconds, policy.max_duration());
        if snapshot.show_countdown_warning {
            line.push_str(&format!(
                "  {}",
                format!("{}s left", snapshot.remaining_seconds).yellow().bold()
            ));
        } else if !snapshot.can_publish {
            line.push_str(&format!(
                "  {}",
                format!("publish from {}s", policy.min_duration()).dimmed()
            ));
        }

        eprint!("\r\x1b[2K{} {}", "●".red(), line);
        let _ = io::stderr().flush();
        self.progress_active.store(true, Ordering::SeqCst);
    }

    /// Terminate a pending progress line
    pub fn end_progress(&self) {
        if self.progress_active.swap(false, Ordering::SeqCst) {
            eprintln!();
        }
    }

    /// Print the recorder state
    pub fn status(&self, snapshot: &SessionSnapshot, policy: &DurationPolicy) {
        self.end_progress();
        self.key_value("status", snapshot.status.as_str());
        self.key_value(
            "elapsed",
            &format!("{}s / {}s", snapshot.elapsed_seconds, policy.max_duration()),
        );
        self.key_value(
            "publishable",
            &format!(
                "{} (min {}s)",
                if snapshot.can_publish { "yes" } else { "no" },
                policy.min_duration()
            ),
        );
        self.key_value("guide", &snapshot.guide_text);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_progress_at_start() {
        let presenter = Presenter::new();
        let progress = presenter.format_progress(0, 59);
        assert!(progress.contains("  0s / 59s"));
    }

    #[test]
    fn format_progress_midway() {
        let presenter = Presenter::new();
        let progress = presenter.format_progress(20, 40);
        assert!(progress.contains(" 20s / 40s"));
        assert_eq!(progress.matches('░').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn format_progress_is_clamped() {
        let presenter = Presenter::new();
        let progress = presenter.format_progress(70, 59);
        assert!(progress.contains("70s / 59s"));
        assert_eq!(progress.matches('░').count(), 0);
    }

    #[test]
    fn format_progress_zero_max() {
        let presenter = Presenter::new();
        let progress = presenter.format_progress(3, 0);
        assert_eq!(progress.matches('░').count(), BAR_WIDTH);
    }

    #[test]
    fn end_progress_is_idempotent() {
        let presenter = Presenter::new();
        presenter.end_progress();
        presenter.progress_active.store(true, Ordering::SeqCst);
        presenter.end_progress();
        assert!(!presenter.progress_active.load(Ordering::SeqCst));
    }
}
