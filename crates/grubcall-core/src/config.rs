//! TOML-based application configuration.
//!
//! Stores the collection schedule:
//! - Daily open time (local to the reference timezone)
//! - Collection duration
//! - Weekday exclusions (no window on those days)
//! - Expiry poll cadence
//!
//! Configuration is stored at `~/.config/grubcall/config.toml`.

use std::collections::HashSet;

use chrono::{Duration, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::store::data_dir;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/grubcall/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local time of day ("HH:MM") at which the daily window opens.
    #[serde(default = "default_open_time")]
    pub daily_open_local_time: String,
    /// How long the window stays open, in minutes.
    #[serde(default = "default_duration_minutes")]
    pub collection_duration_minutes: u32,
    /// Weekday names on which the daily open is skipped.
    #[serde(default = "default_excluded_weekdays")]
    pub excluded_weekdays: Vec<String>,
    /// IANA timezone the schedule is evaluated in.
    #[serde(default = "default_timezone")]
    pub reference_timezone: String,
    #[serde(default = "default_poll_interval")]
    pub expiry_poll_interval_seconds: u64,
    #[serde(default = "default_poll_initial_delay")]
    pub expiry_poll_initial_delay_seconds: u64,
}

fn default_open_time() -> String {
    "09:50".to_string()
}
fn default_duration_minutes() -> u32 {
    30
}
fn default_excluded_weekdays() -> Vec<String> {
    vec!["friday".to_string(), "saturday".to_string()]
}
fn default_timezone() -> String {
    "Africa/Cairo".to_string()
}
fn default_poll_interval() -> u64 {
    60
}
fn default_poll_initial_delay() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_open_local_time: default_open_time(),
            collection_duration_minutes: default_duration_minutes(),
            excluded_weekdays: default_excluded_weekdays(),
            reference_timezone: default_timezone(),
            expiry_poll_interval_seconds: default_poll_interval(),
            expiry_poll_initial_delay_seconds: default_poll_initial_delay(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|err| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/grubcall"),
            message: err.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|err| ConfigError::LoadFailed {
                path,
                message: err.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|err| ConfigError::SaveFailed {
            path: path.clone(),
            message: err.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|err| ConfigError::SaveFailed {
            path,
            message: err.to_string(),
        })
    }

    // ── Typed accessors ──────────────────────────────────────────────

    /// Parsed daily open time.
    pub fn open_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.daily_open_local_time, "%H:%M").map_err(|err| {
            ConfigError::InvalidValue {
                key: "daily_open_local_time".to_string(),
                message: err.to_string(),
            }
        })
    }

    /// Parsed reference timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.reference_timezone
            .parse::<Tz>()
            .map_err(|err| ConfigError::InvalidValue {
                key: "reference_timezone".to_string(),
                message: err.to_string(),
            })
    }

    /// Parsed weekday exclusion set.
    pub fn excluded_days(&self) -> Result<HashSet<Weekday>, ConfigError> {
        self.excluded_weekdays
            .iter()
            .map(|name| {
                name.parse::<Weekday>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "excluded_weekdays".to_string(),
                        message: format!("'{name}' is not a weekday"),
                    })
            })
            .collect()
    }

    pub fn collection_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.collection_duration_minutes))
    }

    /// Validate every field that has a parse step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.open_time()?;
        self.timezone()?;
        self.excluded_days()?;
        if self.collection_duration_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "collection_duration_minutes".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    // ── Key-based access (CLI surface) ───────────────────────────────

    /// Get a config value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "daily_open_local_time" => Some(self.daily_open_local_time.clone()),
            "collection_duration_minutes" => Some(self.collection_duration_minutes.to_string()),
            "excluded_weekdays" => Some(self.excluded_weekdays.join(",")),
            "reference_timezone" => Some(self.reference_timezone.clone()),
            "expiry_poll_interval_seconds" => Some(self.expiry_poll_interval_seconds.to_string()),
            "expiry_poll_initial_delay_seconds" => {
                Some(self.expiry_poll_initial_delay_seconds.to_string())
            }
            _ => None,
        }
    }

    /// Set a config value by key, validating before it is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse.
    /// The config is not saved here; call `save` afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "daily_open_local_time" => {
                NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| invalid(e.to_string()))?;
                self.daily_open_local_time = value.to_string();
            }
            "collection_duration_minutes" => {
                let minutes: u32 = value.parse().map_err(|_| {
                    invalid(format!("cannot parse '{value}' as minutes"))
                })?;
                if minutes == 0 {
                    return Err(invalid("must be positive".to_string()));
                }
                self.collection_duration_minutes = minutes;
            }
            "excluded_weekdays" => {
                let names: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                for name in &names {
                    name.parse::<Weekday>()
                        .map_err(|_| invalid(format!("'{name}' is not a weekday")))?;
                }
                self.excluded_weekdays = names;
            }
            "reference_timezone" => {
                value
                    .parse::<Tz>()
                    .map_err(|e| invalid(e.to_string()))?;
                self.reference_timezone = value.to_string();
            }
            "expiry_poll_interval_seconds" => {
                self.expiry_poll_interval_seconds = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as seconds")))?;
            }
            "expiry_poll_initial_delay_seconds" => {
                self.expiry_poll_initial_delay_seconds = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as seconds")))?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
