//! Configuration for the index layer
//!
//! Loaded from a TOML file; every key is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! recipe_cache_capacity = 128
//! ingredient_cache_capacity = 256
//! completion_limit = 10
//! event_capacity = 256
//! ```

use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configuration for [`IndexContext`](crate::index::IndexContext)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Maximum recipe handles kept in the hot-lookup cache
    pub recipe_cache_capacity: usize,

    /// Maximum ingredient handles kept in the hot-lookup cache
    pub ingredient_cache_capacity: usize,

    /// Default number of autocomplete suggestions
    pub completion_limit: usize,

    /// Event bus channel capacity
    pub event_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            recipe_cache_capacity: 128,
            ingredient_cache_capacity: 256,
            completion_limit: 10,
            event_capacity: 256,
        }
    }
}

impl IndexConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, IndexError> {
        let config: IndexConfig =
            toml::from_str(content).map_err(|e| IndexError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = std::fs::read_to_string(path).map_err(|source| IndexError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: IndexConfig =
            toml::from_str(&content).map_err(|source| IndexError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        debug!(path = %path.display(), ?config, "Index config loaded");
        Ok(config)
    }

    /// Reject capacities that would make a structure unusable
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.recipe_cache_capacity == 0 {
            return Err(IndexError::capacity("recipes", self.recipe_cache_capacity));
        }
        if self.ingredient_cache_capacity == 0 {
            return Err(IndexError::capacity(
                "ingredients",
                self.ingredient_cache_capacity,
            ));
        }
        if self.completion_limit == 0 {
            return Err(IndexError::invalid_config(
                "completion_limit must be greater than 0",
            ));
        }
        if self.event_capacity == 0 {
            return Err(IndexError::invalid_config(
                "event_capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = IndexConfig::from_toml_str("").unwrap();
        assert_eq!(config, IndexConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = IndexConfig::from_toml_str("recipe_cache_capacity = 2").unwrap();
        assert_eq!(config.recipe_cache_capacity, 2);
        assert_eq!(config.ingredient_cache_capacity, 256);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = IndexConfig::from_toml_str("ingredient_cache_capacity = 0").unwrap_err();
        assert!(matches!(
            err,
            IndexError::CapacityViolation { ref cache, capacity: 0 } if cache == "ingredients"
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = IndexConfig::from_toml_str("cache_size = 10").unwrap_err();
        assert!(matches!(err, IndexError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "completion_limit = 5").unwrap();

        let config = IndexConfig::load(file.path()).unwrap();
        assert_eq!(config.completion_limit, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = IndexConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, IndexError::ConfigRead { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "completion_limit = [").unwrap();

        let err = IndexConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, IndexError::ConfigParse { .. }));
    }
}
