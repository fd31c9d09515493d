use gemini_core::config::{get_default_config_file, GeminiConfig};
use gemini_core::errors::{GeminiError, GeminiResult};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Directory name under `~/.config` holding the relay configuration
pub const APP_NAME: &str = "gemini-relay";

fn default_http_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Relay daemon configuration
///
/// ```toml
/// http_addr = "127.0.0.1:8080"
///
/// [gemini]
/// model_name = "gemini-2.0-flash"
/// request_timeout_secs = 60
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            http_addr: default_http_addr(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| GeminiError::ConfigError(format!("Failed to read config file: {}", e)))?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| GeminiError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        // Fields left out of the file keep their defaults
        config.gemini = GeminiConfig::default().merge(&config.gemini);
        Ok(config)
    }

    /// Loads `~/.config/gemini-relay/config.toml`, falling back to defaults
    pub fn load_from_default() -> GeminiResult<Self> {
        Self::load_from_file(&Self::default_path()?)
    }

    pub fn default_path() -> GeminiResult<PathBuf> {
        get_default_config_file(APP_NAME)
    }

    /// Applies environment overrides (`GEMINI_API_KEY` and friends) on top of this config
    pub fn with_env_overrides(mut self) -> Self {
        self.gemini = self.gemini.merge(&GeminiConfig::from_env());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RelayConfig::load_from_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.http_addr, default_http_addr());
        assert_eq!(config.gemini, GeminiConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "http_addr = \"0.0.0.0:3000\"").unwrap();
        writeln!(file, "[gemini]").unwrap();
        writeln!(file, "request_timeout_secs = 15").unwrap();

        let config = RelayConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.http_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.gemini.request_timeout_secs, Some(15));
        assert_eq!(
            config.gemini.model_name,
            GeminiConfig::default().model_name
        );
        assert_eq!(config.gemini.api_key, None);
    }

    #[test]
    fn invalid_address_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "http_addr = \"not an address\"").unwrap();
        assert!(matches!(
            RelayConfig::load_from_file(file.path()),
            Err(GeminiError::ConfigError(_))
        ));
    }
}
