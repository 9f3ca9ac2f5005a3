//! Configuration file support for yorkshire
//!
//! Reads configuration from `~/.config/yorkshire/config.json`, or from the file
//! named by `YORKSHIRE_CONFIG`:
//!
//! ```json
//! {
//!   "index_urls": [
//!     "https://pypi.internal.example/simple"
//!   ]
//! }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use yorkshire::AllowList;

/// Environment variable overriding the config file location
const CONFIG_ENV: &str = "YORKSHIRE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine config directory. HOME environment variable not set.")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Package index URLs that are always allowed
    #[serde(default)]
    pub index_urls: Vec<String>,
}

impl Config {
    /// Load configuration from the default path or return defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Allow-list from the config merged with URLs given on the command line
    pub fn allow_list(&self, extra: &[String]) -> AllowList {
        let mut allow = AllowList::new(self.index_urls.iter().cloned());
        allow.extend(extra.iter().cloned());
        allow
    }
}

/// Returns the config file path: `~/.config/yorkshire/config.json`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".config"))
                .unwrap_or_default()
        });

    if config_base.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigDir);
    }

    Ok(config_base.join("yorkshire").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.index_urls.is_empty());
    }

    #[test]
    fn test_allow_list_merges_cli_urls() {
        let json = r#"{"index_urls": ["https://a.example/simple"]}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        let allow = config.allow_list(&["https://b.example/simple".to_string()]);
        assert!(allow.allows("https://a.example/simple"));
        assert!(allow.allows("https://b.example/simple"));
        assert!(!allow.allows("https://c.example/simple"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.index_urls.is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"index_urls\": 3}").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
