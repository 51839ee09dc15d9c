//! TOML-based application configuration.
//!
//! Stored at `~/.config/habitflow/config.toml` (see [`super::data_dir`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default period for `stats summary`, in days.
    #[serde(default = "default_stats_period_days")]
    pub stats_period_days: u32,
    /// Print the intensity legend under the calendar heatmap.
    #[serde(default = "default_true")]
    pub calendar_legend: bool,
}

fn default_stats_period_days() -> u32 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stats_period_days: default_stats_period_days(),
            calendar_legend: true,
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = super::data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/habitflow"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk; a missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, text).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// String view of one key, for `config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "stats_period_days" => Some(self.stats_period_days.to_string()),
            "calendar_legend" => Some(self.calendar_legend.to_string()),
            _ => None,
        }
    }

    /// Parse-and-assign one key, for `config set`. Saves on success.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "stats_period_days" => {
                let days: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("'{value}' is not a number of days"),
                })?;
                if days == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: "period must be at least one day".to_string(),
                    });
                }
                self.stats_period_days = days;
            }
            "calendar_legend" => {
                self.calendar_legend = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("'{value}' is not a boolean"),
                })?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.stats_period_days, 30);
        assert!(config.calendar_legend);
    }

    #[test]
    fn test_toml_round_trip_with_missing_fields() {
        let config: Config = toml::from_str("stats_period_days = 7").unwrap();
        assert_eq!(config.stats_period_days, 7);
        assert!(config.calendar_legend);
    }

    #[test]
    fn test_get_known_keys() {
        let config = Config::default();
        assert_eq!(config.get("stats_period_days").as_deref(), Some("30"));
        assert_eq!(config.get("calendar_legend").as_deref(), Some("true"));
        assert!(config.get("nope").is_none());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("stats_period_days", "zero"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("stats_period_days", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }
}
