//! Configuration for the snippet service.
//!
//! Settings are stored in TOML. Every field has a default matching the
//! deployed constants (cache capacity 500, fetch timeout 5000 ms, no
//! proxy), so a missing or partial file configures a working service.

use crate::cache::DEFAULT_CAPACITY;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    /// Snippet cache settings.
    pub cache: CacheSettings,
    /// Document acquisition settings.
    pub fetch: FetchSettings,
}

/// Snippet cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of cached snippets before the oldest are evicted.
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CAPACITY,
        }
    }
}

/// Document acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Upper bound on a network fetch, in milliseconds.
    pub timeout_ms: u64,
    /// Optional HTTP proxy for remote fetches.
    pub proxy: Option<ProxyConfig>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            proxy: None,
        }
    }
}

impl FetchSettings {
    /// The fetch timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// HTTP proxy endpoint for remote fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy host name or address.
    pub host: String,
    /// Proxy port.
    pub port: u16,
}

impl ProxyConfig {
    /// The proxy endpoint as a URL string.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl SnippetConfig {
    /// Loads configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml).map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment_constants() {
        let config = SnippetConfig::default();
        assert_eq!(config.cache.max_entries, 500);
        assert_eq!(config.fetch.timeout_ms, 5000);
        assert_eq!(config.fetch.timeout(), Duration::from_millis(5000));
        assert!(config.fetch.proxy.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SnippetConfig = toml::from_str("[cache]\nmax_entries = 64\n").unwrap();
        assert_eq!(config.cache.max_entries, 64);
        assert_eq!(config.fetch.timeout_ms, 5000);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snpt.toml");

        let mut config = SnippetConfig::default();
        config.fetch.timeout_ms = 1234;
        config.fetch.proxy = Some(ProxyConfig {
            host: "proxy.internal".to_string(),
            port: 3128,
        });
        config.save(&path).unwrap();

        let loaded = SnippetConfig::load_from(&path).unwrap();
        assert_eq!(loaded.fetch.timeout_ms, 1234);
        assert_eq!(loaded.fetch.proxy.unwrap().endpoint(), "http://proxy.internal:3128");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let error = SnippetConfig::load_from(Path::new("/nonexistent/snpt.toml")).unwrap_err();
        assert_eq!(error.category(), "config");
    }
}
