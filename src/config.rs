//! Configuration management for promptgen.
//!
//! Configuration is loaded from `~/.config/promptgen/config.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Generation service settings.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Where downloaded artifacts land.
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Generation service endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL the `/generate` path and returned download paths are joined to
    /// (default: http://localhost:8000).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout in seconds for calls to the service. Generation can take
    /// minutes. Artifact downloads use `download.timeout_secs` instead.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Artifact download settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory artifacts are written to (default: current directory).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Timeout in seconds for fetching one artifact, body included.
    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_download_timeout_secs() -> u64 {
    3600
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("promptgen"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, using defaults if not found.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded file.
    pub fn with_overrides(mut self, base_url: Option<String>, output_dir: Option<PathBuf>) -> Self {
        if let Some(base_url) = base_url {
            self.service.base_url = base_url;
        }
        if let Some(output_dir) = output_dir {
            self.download.output_dir = output_dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.timeout(), Duration::from_secs(300));
        assert_eq!(config.download.output_dir, PathBuf::from("."));
        assert_eq!(config.download.timeout(), Duration::from_secs(3600));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("base_url = \"http://localhost:8000\""));
        assert!(toml.contains("[download]"));
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config {
            service: ServiceConfig {
                base_url: "http://gen.internal:9000".to_string(),
                timeout_secs: 45,
            },
            download: DownloadConfig {
                output_dir: PathBuf::from("/srv/decks"),
                timeout_secs: 120,
            },
        };
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
[service]
base_url = "http://gen.internal:9000"

[download]
output_dir = "/tmp/decks"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.service.base_url, "http://gen.internal:9000");
        // Missing keys fall back to defaults
        assert_eq!(config.service.timeout_secs, 300);
        assert_eq!(config.download.output_dir, PathBuf::from("/tmp/decks"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some("http://other:1234".to_string()), None);
        assert_eq!(config.service.base_url, "http://other:1234");
        assert_eq!(config.download.output_dir, PathBuf::from("."));
    }
}
