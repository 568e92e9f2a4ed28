use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slot_engine::SlotConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to Google OAuth client credentials JSON file
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// Path to store the OAuth token cache
    #[serde(default = "default_token_cache")]
    pub token_cache_path: PathBuf,

    /// Calendar to read busy events from
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// Minutes kept free around each event
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: i64,

    /// First hour of the working window
    #[serde(default = "default_hour_start")]
    pub hour_start: u32,

    /// Hour the working window closes (24 = full day)
    #[serde(default = "default_hour_end")]
    pub hour_end: u32,

    /// IANA timezone name for window bounds and display
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_token_cache() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_buffer_minutes() -> i64 {
    30
}

fn default_hour_start() -> u32 {
    9
}

fn default_hour_end() -> u32 {
    18
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            credentials_path: default_credentials_path(),
            token_cache_path: default_token_cache(),
            calendar_id: default_calendar_id(),
            buffer_minutes: default_buffer_minutes(),
            hour_start: default_hour_start(),
            hour_end: default_hour_end(),
            timezone: default_timezone(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` when it exists; built-in defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the slot tunables, parsing the timezone name.
    pub fn slot_config(&self) -> Result<SlotConfig> {
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| anyhow!("Invalid timezone: {}", self.timezone))?;

        Ok(SlotConfig {
            buffer_minutes: self.buffer_minutes,
            hour_start: self.hour_start,
            hour_end: self.hour_end,
            timezone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.token_cache_path, PathBuf::from("token.json"));
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.buffer_minutes, 30);
        assert_eq!(config.hour_start, 9);
        assert_eq!(config.hour_end, 18);
        assert_eq!(config.timezone, "UTC");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: Config = toml::from_str(
            r#"
            buffer_minutes = 45
            timezone = "Europe/Berlin"
            "#,
        )
        .unwrap();
        assert_eq!(config.buffer_minutes, 45);
        assert_eq!(config.timezone, "Europe/Berlin");
        assert_eq!(config.hour_start, 9);
        assert_eq!(config.calendar_id, "primary");
    }

    #[test]
    fn slot_config_parses_the_timezone() {
        let config = Config {
            timezone: "Europe/Berlin".to_string(),
            buffer_minutes: 15,
            ..Config::default()
        };
        let slot_config = config.slot_config().unwrap();
        assert_eq!(slot_config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(slot_config.buffer_minutes, 15);
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let config = Config {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..Config::default()
        };
        assert!(config.slot_config().is_err());
    }
}
