//! Application configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use switchwatch_core::{SharedDigitalInput, DEFAULT_POLL_INTERVAL};

use crate::core::Registry;

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Delay between sampling cycles
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Directory holding `gpio<N>/value` files
    #[serde(default = "default_pin_directory")]
    pub pin_directory: PathBuf,
    /// Declarative description of the status sources.
    ///
    /// Kept as raw JSON so that one malformed entry only fails itself.
    #[serde(default)]
    pub statuses: Vec<Value>,
}

fn default_version() -> u32 {
    1
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_pin_directory() -> PathBuf {
    PathBuf::from("/sys/class/gpio")
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            log::warn!(
                "No config at {}, starting with an empty status list",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "switchwatch", "switchwatch")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Poll interval, a zero interval falls back to the default
    pub fn poll_interval(&self) -> Duration {
        if self.poll_interval_ms == 0 {
            log::warn!("poll_interval_ms is 0, using {:?}", DEFAULT_POLL_INTERVAL);
            return DEFAULT_POLL_INTERVAL;
        }
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Build the registry described by `statuses`
    pub fn build_registry(&self, gpio: &SharedDigitalInput) -> Registry {
        Registry::from_values(&self.statuses, gpio)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            poll_interval_ms: default_poll_interval_ms(),
            pin_directory: default_pin_directory(),
            statuses: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use switchwatch_core::MockDigitalInput;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_for_legacy_file() {
        // Legacy files only carry the status list
        let config: AppConfig = serde_json::from_str(r#"{"statuses": []}"#).unwrap();
        assert_eq!(config.version, 1);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.pin_directory, PathBuf::from("/sys/class/gpio"));
    }

    #[test]
    fn test_zero_interval_falls_back() {
        let config = AppConfig {
            poll_interval_ms: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_save_and_load_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            poll_interval_ms: 1500,
            statuses: vec![json!({"type": "gpio", "name": "Main", "gpio_port": 17})],
            ..AppConfig::default()
        };

        config.save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();

        assert_eq!(loaded.poll_interval(), Duration::from_millis(1500));
        assert_eq!(loaded.statuses, config.statuses);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ statuses: ").unwrap();

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
        assert!(err.to_string().contains("absent.json"));
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_build_registry() {
        let config: AppConfig = serde_json::from_value(json!({
            "statuses": [
                {"type": "gpio", "group": "Power", "name": "Main", "gpio_port": 17},
                {"type": "json", "name": "Inverter"}
            ]
        }))
        .unwrap();
        let gpio: SharedDigitalInput = Arc::new(MockDigitalInput::new());

        let registry = config.build_registry(&gpio);
        assert_eq!(registry.node_count(), 1);
        assert_eq!(registry.failed_names(), vec!["Inverter"]);
    }
}
