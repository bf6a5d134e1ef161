//! Coverage generation configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_FILE;

/// Configuration for building a coverage tree.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CoverageConfig {
    /// Path of the cache artifact.
    #[builder(default = "PathBuf::from(DEFAULT_CACHE_FILE)")]
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Repository ids to use (empty = all registered).
    #[builder(default)]
    #[serde(default)]
    pub repository_ids: Vec<String>,

    /// URL patterns restricting which URLs repositories insert.
    #[builder(default)]
    #[serde(default)]
    pub source_patterns: Vec<String>,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}

impl CoverageConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.cache_path {
            if path.as_os_str().is_empty() {
                return Err("Cache path cannot be empty".to_string());
            }
        }
        if let Some(ref patterns) = self.source_patterns {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                return Err("Source patterns cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl CoverageConfig {
    /// Create a new config builder.
    pub fn builder() -> CoverageConfigBuilder {
        CoverageConfigBuilder::default()
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            repository_ids: Vec::new(),
            source_patterns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = CoverageConfig::builder()
            .cache_path("/var/lib/covertree/cache.json")
            .repository_ids(vec!["eot".to_string()])
            .source_patterns(vec!["https://www.epa.gov/*".to_string()])
            .build()
            .unwrap();

        assert_eq!(config.cache_path, PathBuf::from("/var/lib/covertree/cache.json"));
        assert_eq!(config.repository_ids, vec!["eot"]);
        assert_eq!(config.source_patterns.len(), 1);
    }

    #[test]
    fn test_config_defaults() {
        let config = CoverageConfig::builder().build().unwrap();
        assert_eq!(config.cache_path, PathBuf::from("cache.json"));
        assert!(config.repository_ids.is_empty());
        assert!(config.source_patterns.is_empty());
    }

    #[test]
    fn test_config_rejects_empty_values() {
        assert!(CoverageConfig::builder().cache_path("").build().is_err());
        assert!(
            CoverageConfig::builder()
                .source_patterns(vec!["  ".to_string()])
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: CoverageConfig = serde_json::from_str(r#"{"repository_ids":["a"]}"#).unwrap();
        assert_eq!(config.cache_path, PathBuf::from("cache.json"));
        assert_eq!(config.repository_ids, vec!["a"]);
    }
}
