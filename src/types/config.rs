//! Configuration for polquiz.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::PolquizResult;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "polquiz.toml";

/// Main configuration for polquiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Quiz session settings.
    #[serde(default)]
    pub quiz: QuizConfig,

    /// Result rendering settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Quiz session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Shuffle question order when a session starts.
    #[serde(default = "default_true")]
    pub shuffle: bool,

    /// Fixed shuffle seed. When unset the seed comes from the wall clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: None,
        }
    }
}

/// Result rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Embed the SVG chart in the final report.
    #[serde(default = "default_true")]
    pub svg: bool,

    /// Width of the SVG chart in pixels.
    #[serde(default = "default_svg_size")]
    pub size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            svg: true,
            size: default_svg_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_svg_size() -> u32 {
    400
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> PolquizResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> PolquizResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Resolves which file to read: the given path if it exists, otherwise
    /// `polquiz/polquiz.toml` under the user config directory.
    pub fn resolve_path(path: &Path) -> Option<PathBuf> {
        if path.exists() {
            return Some(path.to_path_buf());
        }

        dirs::config_dir()
            .map(|dir| dir.join("polquiz").join(CONFIG_FILE))
            .filter(|candidate| candidate.exists())
    }

    /// Tries to load configuration from `path` (or the user config dir) or uses default.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::resolve_path(path) {
            Some(found) => Self::load(&found).unwrap_or_else(|e| {
                eprintln!("Warning: ignoring invalid config {}: {}", found.display(), e);
                Self::default_config()
            }),
            None => Self::default_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "text");
        assert!(config.quiz.shuffle);
        assert!(config.quiz.seed.is_none());
        assert!(config.render.svg);
        assert_eq!(config.render.size, 400);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[quiz]\nseed = 7\n").unwrap();
        assert_eq!(config.quiz.seed, Some(7));
        assert!(config.quiz.shuffle);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.quiz.shuffle = false;
        config.render.size = 600;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(!loaded.quiz.shuffle);
        assert_eq!(loaded.render.size, 600);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[quiz\nshuffle = ").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
