use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server the export link points at
    pub export_base_url: String,
    /// Pixel height of one terminal row, used to map the persisted split
    /// height onto rows
    pub cell_height_px: u16,
    /// Event polling interval
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_base_url: "http://localhost:9000".to_string(),
            cell_height_px: 16,
            tick_rate_ms: 100,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok().filter(|h| !h.is_empty())?;
        Some(PathBuf::from(home).join(".query-console"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str::<Config>(&contents) {
            Ok(config) => Some(config.sanitized()),
            Err(err) => {
                tracing::warn!(path = %config_path.display(), %err, "ignoring invalid config");
                None
            }
        }
    }

    /// Load the config, falling back to defaults
    pub fn load_or_default() -> Config {
        Self::load().unwrap_or_default()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Replace out-of-range values with defaults
    pub fn sanitized(mut self) -> Config {
        let defaults = Config::default();
        if self.cell_height_px == 0 {
            self.cell_height_px = defaults.cell_height_px;
        }
        if self.tick_rate_ms == 0 {
            self.tick_rate_ms = defaults.tick_rate_ms;
        }
        if self.export_base_url.trim().is_empty() {
            self.export_base_url = defaults.export_base_url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"cell_height_px": 20}"#).unwrap();
        assert_eq!(config.cell_height_px, 20);
        assert_eq!(config.export_base_url, "http://localhost:9000");
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_sanitized_replaces_zeroes() {
        let config = Config {
            export_base_url: " ".to_string(),
            cell_height_px: 0,
            tick_rate_ms: 0,
        }
        .sanitized();
        assert_eq!(config, Config::default());
    }
}
