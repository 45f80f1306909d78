//! Error types for cookbook-core
//!
//! Lookups in the index layer are total (absent keys yield `None` or an empty
//! list), so the error hierarchy only covers configuration misuse and the
//! file-backed loaders. Bulk imports degrade gracefully through [`ImportReport`].

use crate::models::EntityClass;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cookbook operations
#[derive(Error, Debug)]
pub enum IndexError {
    // ===================
    // Configuration Errors
    // ===================
    #[error("Cache '{cache}' must hold at least one entry (got capacity {capacity})")]
    CapacityViolation { cache: String, capacity: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML in {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // ===================
    // Catalogue File Errors
    // ===================
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl IndexError {
    pub fn capacity(cache: impl Into<String>, capacity: usize) -> Self {
        IndexError::CapacityViolation {
            cache: cache.into(),
            capacity,
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        IndexError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Individual entity skipped or adjusted during a bulk import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportWarning {
    pub class: EntityClass,
    /// Position of the entity in the source list
    pub position: usize,
    pub message: String,
}

/// Report of a bulk import into the catalogue
///
/// Enables graceful degradation: malformed entries are skipped and recorded
/// instead of aborting the whole import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub recipes_imported: usize,
    pub ingredients_imported: usize,
    /// Entries whose name was already present and got overwritten
    pub overwritten: usize,
    pub warnings: Vec<ImportWarning>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, class: EntityClass, position: usize, message: impl Into<String>) {
        self.warnings.push(ImportWarning {
            class,
            position,
            message: message.into(),
        });
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Total entities written to the store
    pub fn total_imported(&self) -> usize {
        self.recipes_imported + self.ingredients_imported
    }
}
