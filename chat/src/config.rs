use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under `~/.config` for the chat client
pub const APP_NAME: &str = "gemini-chat";

/// Storage key the transcript is kept under
pub const DEFAULT_STORAGE_KEY: &str = "chatMessages";

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8080/api/chat";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;

/// Chat client configuration, read from `~/.config/gemini-chat/config.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ChatConfig {
    pub relay_url: Option<String>,
    pub storage_dir: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl ChatConfig {
    /// Loads configuration from a file if it exists, otherwise returns an empty config
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join(APP_NAME))
    }

    pub fn relay_url(&self) -> &str {
        self.relay_url.as_deref().unwrap_or(DEFAULT_RELAY_URL)
    }

    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    /// Directory holding the transcript; falls back to the current directory
    /// when no home directory can be found.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .or_else(Self::default_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .map(|level| match level.to_lowercase().as_str() {
                "trace" => LevelFilter::Trace,
                "debug" => LevelFilter::Debug,
                "info" => LevelFilter::Info,
                "warn" => LevelFilter::Warn,
                "error" => LevelFilter::Error,
                "off" => LevelFilter::Off,
                _ => LevelFilter::Warn,
            })
            .unwrap_or(LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.relay_url(), DEFAULT_RELAY_URL);
        assert_eq!(config.storage_key(), "chatMessages");
        assert_eq!(config.request_timeout(), Duration::from_secs(90));
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "relay_url = \"http://relay:9000/api/chat\"").unwrap();
        writeln!(file, "storage_dir = \"/tmp/chat\"").unwrap();
        writeln!(file, "log_level = \"DEBUG\"").unwrap();

        let config = ChatConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.relay_url(), "http://relay:9000/api/chat");
        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/chat"));
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.storage_key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChatConfig::load_from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ChatConfig::default());
    }
}
