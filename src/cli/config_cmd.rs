//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::audio::AudioFormat;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    // The three limits are only meaningful together
    AppConfig::defaults().merge(config.clone()).policy()?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    let value = read_value(&config, key);
    presenter.output(value.as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = read_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "min_duration" | "max_duration" | "countdown_window" => {
            let duration = value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            let normalized = Some(duration.to_string());
            match key {
                "min_duration" => config.min_duration = normalized,
                "max_duration" => config.max_duration = normalized,
                _ => config.countdown_window = normalized,
            }
        }
        "format" => {
            let format = value
                .parse::<AudioFormat>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.format = Some(format.to_string());
        }
        "sample_rate" => {
            let rate = value
                .parse::<u32>()
                .ok()
                .filter(|&rate| rate > 0)
                .ok_or_else(|| invalid(key, "Value must be a positive integer (Hz)"))?;
            config.sample_rate = Some(rate);
        }
        "output_dir" => config.output_dir = Some(value.to_string()),
        "passage" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Passage must not be empty"));
            }
            config.passage = Some(value.to_string());
        }
        "playback" => {
            let enabled =
                parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))?;
            config.playback = Some(enabled);
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "min_duration" => config.min_duration.clone(),
        "max_duration" => config.max_duration.clone(),
        "countdown_window" => config.countdown_window.clone(),
        "format" => config.format.clone(),
        "sample_rate" => config.sample_rate.map(|r| r.to_string()),
        "output_dir" => config.output_dir.clone(),
        "passage" => config.passage.clone(),
        "playback" => config.playback.map(|b| b.to_string()),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PolicyError;
    use crate::infrastructure::XdgConfigStore;

    fn store() -> (tempfile::TempDir, XdgConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        (dir, store)
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn durations_are_normalized() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "max_duration", "0m45s").unwrap();
        assert_eq!(config.max_duration.as_deref(), Some("45s"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "min_duration", "eleven").is_err());
        assert!(apply_value(&mut config, "format", "mp3").is_err());
        assert!(apply_value(&mut config, "sample_rate", "0").is_err());
        assert!(apply_value(&mut config, "sample_rate", "fast").is_err());
        assert!(apply_value(&mut config, "playback", "sometimes").is_err());
        assert!(apply_value(&mut config, "passage", "   ").is_err());
        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn read_value_formats_non_strings() {
        let config = AppConfig {
            sample_rate: Some(44_100),
            playback: Some(false),
            ..Default::default()
        };
        assert_eq!(read_value(&config, "sample_rate").as_deref(), Some("44100"));
        assert_eq!(read_value(&config, "playback").as_deref(), Some("false"));
        assert!(read_value(&config, "passage").is_none());
    }

    #[tokio::test]
    async fn set_persists_value() {
        let (_dir, store) = store();
        let presenter = Presenter::new();

        handle_set(&store, &presenter, "min_duration", "16s")
            .await
            .unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.min_duration.as_deref(), Some("16s"));
    }

    #[tokio::test]
    async fn set_rejects_unknown_key() {
        let (_dir, store) = store();
        let presenter = Presenter::new();

        let result = handle_set(&store, &presenter, "api_key", "x").await;
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn set_rejects_inconsistent_limits() {
        let (_dir, store) = store();
        let presenter = Presenter::new();

        // Default max is 59s
        let result = handle_set(&store, &presenter, "min_duration", "1m").await;
        assert!(matches!(
            result,
            Err(ConfigError::Policy(PolicyError::MinNotBelowMax { .. }))
        ));
        assert!(!store.exists());
    }
}
