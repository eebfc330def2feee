use crate::commands::pages::STATUS_DATE_FORMAT;
use crate::error::{QuireError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Key of the storage slot holding the serialized store.
pub const DEFAULT_SLOT_KEY: &str = "ls_notebooks_v1";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration for quire, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuireConfig {
    /// Storage slot key. Changing it points quire at a different store.
    #[serde(default = "default_slot_key")]
    pub slot_key: String,

    /// Log level used when `--verbose` and `RUST_LOG` are absent
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// chrono format string for "last saved" in the status line
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_slot_key() -> String {
    DEFAULT_SLOT_KEY.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_date_format() -> String {
    STATUS_DATE_FORMAT.to_string()
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self {
            slot_key: default_slot_key(),
            log_level: default_log_level(),
            date_format: default_date_format(),
        }
    }
}

impl QuireConfig {
    pub const KEYS: [&'static str; 3] = ["slot-key", "log-level", "date-format"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(QuireError::Io)?;
        let config: QuireConfig =
            serde_json::from_str(&content).map_err(QuireError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(QuireError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(QuireError::Serialization)?;
        fs::write(config_path, content).map_err(QuireError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "slot-key" => Some(self.slot_key.clone()),
            "log-level" => Some(self.log_level.clone()),
            "date-format" => Some(self.date_format.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "slot-key" => {
                if value.is_empty() {
                    return Err("slot-key cannot be empty".to_string());
                }
                self.slot_key = value.to_string();
            }
            "log-level" => {
                let level = value.to_lowercase();
                if !matches!(
                    level.as_str(),
                    "off" | "error" | "warn" | "info" | "debug" | "trace"
                ) {
                    return Err(format!("Invalid log level: {}", value));
                }
                self.log_level = level;
            }
            "date-format" => {
                if value.is_empty() {
                    return Err("date-format cannot be empty".to_string());
                }
                self.date_format = value.to_string();
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuireConfig::default();
        assert_eq!(config.slot_key, "ls_notebooks_v1");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuireConfig::load(dir.path()).unwrap();
        assert_eq!(config, QuireConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = QuireConfig::default();
        config.set("slot-key", "other_slot").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = QuireConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.slot_key, "other_slot");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"log_level":"debug"}"#).unwrap();
        let config = QuireConfig::load(dir.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.slot_key, DEFAULT_SLOT_KEY);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = QuireConfig::default();
        assert!(config.set("log-level", "loud").is_err());
        assert!(config.set("slot-key", "  ").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, QuireConfig::default());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = QuireConfig::default();
        for key in QuireConfig::KEYS {
            assert!(config.get(key).is_some());
        }
        assert_eq!(config.get("nope"), None);
    }
}
