//! Interactive recorder runner
//!
//! Reads line commands from stdin and multiplexes them with the
//! controller's ticks and Ctrl-C on a single task, so controller
//! operations never overlap.

use std::future::Future;
use std::pin::Pin;
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::{AudioPlayer, CaptureSession, ConfigStore, SampleSink};
use crate::application::{RecordingController, TickOutcome};
use crate::domain::audio::{AudioBlob, AudioFormat};
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::{Duration, DurationPolicy};
use crate::infrastructure::{create_player, CpalCaptureSession, FileSink, XdgConfigStore};

use super::args::RecorderOptions;
use super::commands::RecorderCommand;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run the interactive recorder until `quit`, end of input or Ctrl-C
pub async fn run_recorder(options: RecorderOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let capture = CpalCaptureSession::new(options.format, options.sample_rate);
    let mut controller = RecordingController::new(capture, options.policy);
    let sink = FileSink::new(&options.output_dir);
    let player = create_player(options.playback);
    let mut last_take: Option<AudioBlob> = None;

    tracing::debug!(?options, "recorder ready");
    presenter.passage(&options.passage);
    presenter.guide(controller.guide_text());
    presenter.help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let code = loop {
        tokio::select! {
            tick = controller.recv_tick() => {
                match controller.on_tick(tick).await {
                    TickOutcome::Stale => {}
                    TickOutcome::Elapsed(_) => {
                        presenter.progress(&controller.snapshot(), controller.policy());
                    }
                    TickOutcome::TimedOut => presenter.warn(controller.guide_text()),
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break EXIT_SUCCESS,
                    Err(e) => {
                        presenter.error(&format!("Failed to read input: {}", e));
                        break EXIT_ERROR;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<RecorderCommand>() {
                    Ok(RecorderCommand::Quit) => break EXIT_SUCCESS,
                    Ok(RecorderCommand::Play) => {
                        let interrupted = play_last_take(
                            &controller,
                            player.as_ref(),
                            &mut presenter,
                            last_take.as_ref(),
                            ctrl_c.as_mut(),
                        )
                        .await;
                        if interrupted {
                            break EXIT_SUCCESS;
                        }
                    }
                    Ok(command) => {
                        execute(
                            command,
                            &mut controller,
                            &sink,
                            &mut presenter,
                            &mut last_take,
                        )
                        .await;
                    }
                    Err(e) => presenter.error(&e.to_string()),
                }
            }
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "ctrl-c handler failed");
                }
                presenter.info("Interrupted");
                break EXIT_SUCCESS;
            }
        }
    };

    controller.teardown().await;
    presenter.end_progress();
    ExitCode::from(code)
}

/// Run one line command against the controller
async fn execute<C, S>(
    command: RecorderCommand,
    controller: &mut RecordingController<C>,
    sink: &S,
    presenter: &mut Presenter,
    last_take: &mut Option<AudioBlob>,
) where
    C: CaptureSession,
    S: SampleSink,
{
    match command {
        RecorderCommand::Start => match controller.start_record().await {
            Ok(()) => presenter.guide(controller.guide_text()),
            Err(e) => report(presenter, controller, &e.to_string()),
        },
        RecorderCommand::Pause => match controller.paused_record() {
            Ok(()) => presenter.guide(controller.guide_text()),
            Err(e) => presenter.error(&e.to_string()),
        },
        RecorderCommand::Resume => match controller.resume_record() {
            Ok(()) => presenter.guide(controller.guide_text()),
            Err(e) => presenter.error(&e.to_string()),
        },
        RecorderCommand::Reset => match controller.reset_record().await {
            Ok(()) => {
                *last_take = None;
                presenter.info("Previous take discarded");
                presenter.guide(controller.guide_text());
            }
            Err(e) => report(presenter, controller, &e.to_string()),
        },
        RecorderCommand::Stop => {
            presenter.start_spinner("Finalizing recording...");
            match controller.stop_record().await {
                Ok(blob) => {
                    presenter.spinner_success(&format!(
                        "Recording stopped ({})",
                        blob.human_readable_size()
                    ));
                    *last_take = Some(blob);
                    presenter.guide(controller.guide_text());
                }
                Err(e) => {
                    presenter.spinner_fail(&e.to_string());
                    presenter.guide(controller.guide_text());
                }
            }
        }
        RecorderCommand::Publish => {
            presenter.start_spinner("Finalizing recording...");
            let sample = match controller.publish().await {
                Ok(sample) => sample,
                Err(e) => {
                    presenter.spinner_fail(&e.to_string());
                    presenter.warn(controller.guide_text());
                    return;
                }
            };

            presenter.update_spinner(&format!("Saving {}...", sample.file_name));
            let stored = sink.store(&sample.blob, &sample.file_name).await;
            if let Err(e) = controller.complete_upload(stored.is_ok()) {
                tracing::error!(error = %e, "upload result could not be recorded");
            }
            match stored {
                Ok(path) => {
                    presenter.spinner_success(&format!(
                        "Saved {} ({}s, {})",
                        path.display(),
                        sample.seconds,
                        sample.blob.human_readable_size()
                    ));
                    *last_take = Some(sample.blob);
                }
                Err(e) => presenter.spinner_fail(&e.to_string()),
            }
            presenter.guide(controller.guide_text());
        }
        RecorderCommand::Status => presenter.status(&controller.snapshot(), controller.policy()),
        RecorderCommand::Help => presenter.help(),
        // Both need the run loop's Ctrl-C future
        RecorderCommand::Play | RecorderCommand::Quit => {}
    }
}

/// Play the last take until it ends or `interrupt` resolves.
///
/// Returns true when playback was interrupted.
async fn play_last_take<C, F>(
    controller: &RecordingController<C>,
    player: &dyn AudioPlayer,
    presenter: &mut Presenter,
    last_take: Option<&AudioBlob>,
    interrupt: Pin<&mut F>,
) -> bool
where
    C: CaptureSession,
    F: Future<Output = std::io::Result<()>>,
{
    let Some(blob) = last_take else {
        presenter.warn("Nothing to play yet. Stop or publish a recording first");
        return false;
    };
    if controller.status().holds_capture() {
        presenter.warn("Stop the recording before playing it back");
        return false;
    }

    presenter.start_spinner("Playing...");
    tokio::select! {
        result = player.play(blob) => {
            match result {
                Ok(()) => presenter.spinner_success("Playback finished"),
                Err(e) => presenter.spinner_fail(&e.to_string()),
            }
            false
        }
        result = interrupt => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "ctrl-c handler failed");
            }
            presenter.spinner_fail("Playback interrupted");
            true
        }
    }
}

fn report<C: CaptureSession>(
    presenter: &Presenter,
    controller: &RecordingController<C>,
    error: &str,
) {
    presenter.error(error);
    presenter.guide(controller.guide_text());
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Resolve recorder options, rejecting malformed or contradictory values
pub fn recorder_options(config: &AppConfig) -> Result<RecorderOptions, ConfigError> {
    let min = parse_duration("min_duration", config.min_duration.as_deref(), Duration::default_min())?;
    let max = parse_duration("max_duration", config.max_duration.as_deref(), Duration::default_max())?;
    let window = parse_duration(
        "countdown_window",
        config.countdown_window.as_deref(),
        Duration::default_countdown_window(),
    )?;
    let policy = DurationPolicy::new(min, max, window)?;

    let format = match config.format.as_deref() {
        Some(s) => s
            .parse::<AudioFormat>()
            .map_err(|e| ConfigError::ValidationError {
                key: "format".to_string(),
                message: e.to_string(),
            })?,
        None => AudioFormat::default(),
    };

    if config.sample_rate == Some(0) {
        return Err(ConfigError::ValidationError {
            key: "sample_rate".to_string(),
            message: "Value must be a positive integer (Hz)".to_string(),
        });
    }

    Ok(RecorderOptions {
        policy,
        format,
        sample_rate: config.sample_rate_or_default(),
        output_dir: config.output_dir_or_default(),
        passage: config.passage_or_default().to_string(),
        playback: config.playback_or_default(),
    })
}

fn parse_duration(key: &str, value: Option<&str>, default: Duration) -> Result<Duration, ConfigError> {
    match value {
        Some(s) => s
            .parse::<Duration>()
            .map_err(|e| ConfigError::ValidationError {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(default),
    }
}

/// Exit code for a configuration failure
pub fn config_exit_code(error: &ConfigError) -> u8 {
    match error {
        ConfigError::ValidationError { .. } | ConfigError::Policy(_) => EXIT_USAGE_ERROR,
        _ => EXIT_ERROR,
    }
}
