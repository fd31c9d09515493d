use crate::errors::{GeminiError, GeminiResult};
use crate::types::DEFAULT_MODEL;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default base URL of the generative-language API
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default upstream request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Configuration struct for Gemini API
#[derive(Deserialize, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

// Hand-written so the key can never end up in a log line.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: Some(DEFAULT_MODEL.to_string()),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                GeminiError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                GeminiError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Reads overrides from the process environment (and a `.env` file, if any).
    ///
    /// Recognised variables: `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_API_BASE_URL`,
    /// `GEMINI_REQUEST_TIMEOUT_SECS`. Unset or empty variables leave the field `None`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_key: get("GEMINI_API_KEY"),
            model_name: get("GEMINI_MODEL"),
            api_base_url: get("GEMINI_API_BASE_URL"),
            request_timeout_secs: get("GEMINI_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            api_base_url: other
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }

    /// Full `generateContent` URL for the configured model, without the key.
    pub fn endpoint_url(&self) -> String {
        let base = self
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/');
        let model = self.model_name.as_deref().unwrap_or(DEFAULT_MODEL);
        format!("{}/models/{}:generateContent", base, model)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine home directory".to_string())
    })?;

    let config_dir = home_dir.join(".config").join(app_name);

    Ok(config_dir)
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn endpoint_url_uses_model_and_base() {
        let config = GeminiConfig {
            api_base_url: Some("http://localhost:9000/v1beta/".to_string()),
            model_name: Some("gemini-test".to_string()),
            ..GeminiConfig::default()
        };
        assert_eq!(
            config.endpoint_url(),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn default_endpoint_is_flash_model() {
        assert_eq!(
            GeminiConfig::default().endpoint_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn merge_prefers_other_values() {
        let base = GeminiConfig::default();
        let overlay = GeminiConfig {
            api_key: Some("secret".to_string()),
            model_name: None,
            api_base_url: None,
            request_timeout_secs: Some(5),
        };
        let merged = base.merge(&overlay);
        assert_eq!(merged.api_key.as_deref(), Some("secret"));
        assert_eq!(merged.model_name.as_deref(), Some(DEFAULT_MODEL));
        assert_eq!(merged.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn env_lookup_ignores_blank_values() {
        let vars: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_MODEL", "  "),
            ("GEMINI_REQUEST_TIMEOUT_SECS", "12"),
        ]
        .into_iter()
        .collect();
        let config = GeminiConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.model_name, None);
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.request_timeout_secs, Some(12));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = GeminiConfig {
            api_key: Some("super-secret-key".to_string()),
            ..GeminiConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn load_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model_name = \"gemini-custom\"").unwrap();
        let config = GeminiConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.model_name.as_deref(), Some("gemini-custom"));
        assert_eq!(config.api_base_url.as_deref(), Some(DEFAULT_API_BASE_URL));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn load_from_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeminiConfig::load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GeminiConfig::default());
    }

    #[test]
    fn load_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model_name = ").unwrap();
        let result = GeminiConfig::load_from_file(file.path());
        assert!(matches!(result, Err(GeminiError::ConfigError(_))));
    }
}
