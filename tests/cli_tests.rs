//! CLI integration tests
//!
//! The recorder only opens the microphone on `start`, so sessions driven
//! through stdin without it run on machines with no audio hardware.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with config isolated to a temp dir and colors off
fn voice_sampler(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("voice-sampler").expect("binary should build");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice sample"))
        .stdout(predicate::str::contains("--min-duration"))
        .stdout(predicate::str::contains("--max-duration"))
        .stdout(predicate::str::contains("--countdown-window"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--no-playback"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-sampler"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_help() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn config_set_unknown_key_is_usage_error() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .args(["config", "set", "api_key", "secret"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_duration_is_usage_error() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .args(["config", "set", "max_duration", "forever"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn invalid_format_flag() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .args(["--format", "mp3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn invalid_duration_flag() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .args(["--max-duration", "soon"])
        .write_stdin("quit\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn contradictory_limits() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .args(["--min-duration", "30s", "--max-duration", "20s"])
        .write_stdin("quit\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must be less than"));
}

#[test]
fn quit_without_recording() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .write_stdin("quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Read aloud"))
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn end_of_input_exits_cleanly() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home).write_stdin("").assert().success();
}

#[test]
fn status_reports_idle() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .args(["--min-duration", "16s"])
        .write_stdin("status\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("status: idle"))
        .stdout(predicate::str::contains("min 16s"));
}

#[test]
fn commands_out_of_order_are_rejected() {
    let home = TempDir::new().unwrap();
    voice_sampler(&home)
        .write_stdin("pause\npublish\nplay\ndance\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("cannot pause recording while in idle state"))
        .stderr(predicate::str::contains("cannot publish recording while in idle state"))
        .stderr(predicate::str::contains("Nothing to play yet"))
        .stderr(predicate::str::contains("Unknown command"));
}

#[cfg(target_os = "linux")]
mod config_file {
    use super::*;

    #[test]
    fn path_is_under_config_home() {
        let home = TempDir::new().unwrap();
        let expected = home.path().join("voice-sampler").join("config.toml");
        voice_sampler(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected.to_string_lossy().to_string()));
    }

    #[test]
    fn set_then_get() {
        let home = TempDir::new().unwrap();
        voice_sampler(&home)
            .args(["config", "set", "max_duration", "45s"])
            .assert()
            .success();

        voice_sampler(&home)
            .args(["config", "get", "max_duration"])
            .assert()
            .success()
            .stdout(predicate::str::contains("45s"));

        voice_sampler(&home)
            .args(["config", "get", "passage"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(not set)"));
    }

    #[test]
    fn init_twice_fails() {
        let home = TempDir::new().unwrap();
        voice_sampler(&home).args(["config", "init"]).assert().success();
        voice_sampler(&home)
            .args(["config", "init"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn list_shows_every_key() {
        let home = TempDir::new().unwrap();
        voice_sampler(&home).args(["config", "init"]).assert().success();
        voice_sampler(&home)
            .args(["config", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("min_duration: 11s"))
            .stdout(predicate::str::contains("max_duration: 59s"))
            .stdout(predicate::str::contains("sample_rate: 48000"))
            .stdout(predicate::str::contains("playback: true"));
    }

    #[test]
    fn file_limits_apply_to_recorder() {
        let home = TempDir::new().unwrap();
        voice_sampler(&home)
            .args(["config", "set", "min_duration", "20s"])
            .assert()
            .success();

        voice_sampler(&home)
            .write_stdin("status\nquit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("min 20s"));
    }
}
