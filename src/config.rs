use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const TIMED_TEST_MINUTES: [u32; 3] = [1, 3, 5];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Name printed on certificates; also the pre-filled value on the
    /// certificate name screen. Empty means ask every time.
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_timed_minutes")]
    pub timed_minutes: u32,
    #[serde(default = "default_show_live_wpm")]
    pub show_live_wpm: bool,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_display_name() -> String {
    String::new()
}
fn default_timed_minutes() -> u32 {
    1
}
fn default_show_live_wpm() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            display_name: default_display_name(),
            timed_minutes: default_timed_minutes(),
            show_live_wpm: default_show_live_wpm(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize_timed_minutes();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typemaster")
            .join("config.toml")
    }

    /// Only the offered durations are valid; anything else in a stale or
    /// hand-edited file falls back to the default.
    pub fn normalize_timed_minutes(&mut self) {
        if !TIMED_TEST_MINUTES.contains(&self.timed_minutes) {
            self.timed_minutes = default_timed_minutes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.display_name, "");
        assert_eq!(config.timed_minutes, 1);
        assert!(config.show_live_wpm);
    }

    #[test]
    fn test_config_serde_partial_file() {
        let config: Config = toml::from_str("theme = \"monokai\"\ntimed_minutes = 5\n").unwrap();
        assert_eq!(config.theme, "monokai");
        assert_eq!(config.timed_minutes, 5);
        assert!(config.show_live_wpm);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.display_name = "Ada".to_string();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.display_name, deserialized.display_name);
        assert_eq!(config.timed_minutes, deserialized.timed_minutes);
    }

    #[test]
    fn test_normalize_timed_minutes_rejects_unoffered_duration() {
        let mut config = Config::default();
        config.timed_minutes = 7;
        config.normalize_timed_minutes();
        assert_eq!(config.timed_minutes, 1);
    }

    #[test]
    fn test_normalize_timed_minutes_keeps_valid_duration() {
        let mut config = Config::default();
        config.timed_minutes = 3;
        config.normalize_timed_minutes();
        assert_eq!(config.timed_minutes, 3);
    }
}
