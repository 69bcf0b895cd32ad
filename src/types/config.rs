//! Configuration for the AgriServe query cache.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{CacheError, CacheResult};

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "agriserve-cache.toml";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Cache namespace settings.
    #[serde(default)]
    pub caches: CachesConfig,
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

/// Settings for the three cache namespaces used by the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachesConfig {
    /// Query embeddings.
    #[serde(default = "default_embedding_cache")]
    pub embedding: NamespaceConfig,

    /// Generic query results.
    #[serde(default = "default_query_cache")]
    pub query: NamespaceConfig,

    /// User profiles.
    #[serde(default = "default_user_profile_cache")]
    pub user_profile: NamespaceConfig,
}

impl Default for CachesConfig {
    fn default() -> Self {
        Self {
            embedding: default_embedding_cache(),
            query: default_query_cache(),
            user_profile: default_user_profile_cache(),
        }
    }
}

impl CachesConfig {
    /// Iterates over `(name, settings)` pairs in a stable order.
    pub fn namespaces(&self) -> [(&'static str, &NamespaceConfig); 3] {
        [
            ("embedding", &self.embedding),
            ("query", &self.query),
            ("user_profile", &self.user_profile),
        ]
    }
}

fn default_embedding_cache() -> NamespaceConfig {
    NamespaceConfig::new(500, 60 * 60 * 1000) // 1 hour
}

fn default_query_cache() -> NamespaceConfig {
    NamespaceConfig::new(200, 5 * 60 * 1000) // 5 minutes
}

fn default_user_profile_cache() -> NamespaceConfig {
    NamespaceConfig::new(100, 10 * 60 * 1000) // 10 minutes
}

/// Settings for a single cache namespace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// Maximum number of entries.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Entry time to live in milliseconds.
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

impl NamespaceConfig {
    /// Creates namespace settings.
    pub fn new(capacity: usize, ttl_ms: u64) -> Self {
        Self { capacity, ttl_ms }
    }

    /// TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self::new(default_capacity(), default_ttl_ms())
    }
}

fn default_capacity() -> usize {
    100
}

fn default_ttl_ms() -> u64 {
    5 * 60 * 1000
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> CacheResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> CacheResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            caches: CachesConfig::default(),
        }
    }

    /// Lists every problem found in the configuration.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            issues.push(format!(
                "general.log_level '{}' is not one of {:?}",
                self.general.log_level, LOG_LEVELS
            ));
        }
        if !LOG_FORMATS.contains(&self.general.log_format.as_str()) {
            issues.push(format!(
                "general.log_format '{}' is not one of {:?}",
                self.general.log_format, LOG_FORMATS
            ));
        }

        for (name, ns) in self.caches.namespaces() {
            if ns.capacity == 0 {
                issues.push(format!("caches.{name}.capacity must be greater than zero"));
            }
        }

        issues
    }

    /// Fails with [`CacheError::InvalidConfiguration`] on the first problem found.
    pub fn validate(&self) -> CacheResult<()> {
        match self.issues().into_iter().next() {
            Some(issue) => Err(CacheError::invalid_config(issue)),
            None => Ok(()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.issues().is_empty());
        assert!(config.validate().is_ok());
        assert_eq!(config.caches.embedding.capacity, 500);
        assert_eq!(config.caches.query.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [caches.query]
            capacity = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.caches.query.capacity, 3);
        assert_eq!(config.caches.query.ttl_ms, 5 * 60 * 1000);
        assert_eq!(config.caches.embedding, default_embedding_cache());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.caches.user_profile.capacity = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, CacheError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("caches.user_profile.capacity"));
    }

    #[test]
    fn test_issues_reports_everything() {
        let mut config = Config::default();
        config.general.log_level = "loud".to_string();
        config.general.log_format = "xml".to_string();
        config.caches.embedding.capacity = 0;

        assert_eq!(config.issues().len(), 3);
    }

    #[test]
    fn test_load_malformed_toml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[caches.query]\ncapacity = 1\nttl_ms = \"five\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(CacheError::TomlParse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Config::default();
        config.caches.query = NamespaceConfig::new(42, 1500);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.caches.query, NamespaceConfig::new(42, 1500));
        assert_eq!(loaded.general.log_format, "text");
    }
}
