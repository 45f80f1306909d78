//! cookbook-core - Core library for cookbook
//!
//! Provides the recipe/ingredient models, the canonical catalogue store, and
//! the derived indexing layer in front of it (prefix trie, LRU caches,
//! ordered name/date/rating indexes).

pub mod config;
pub mod error;
pub mod event;
pub mod index;
pub mod loader;
pub mod models;
pub mod store;

pub use config::IndexConfig;
pub use error::{ImportReport, ImportWarning, IndexError};
pub use event::{EventBus, IndexEvent};
pub use index::{IndexContext, IndexStats};
pub use loader::{load_catalogue_file, CatalogueFile};
pub use models::{EntityClass, Indexed, Ingredient, Recipe};
pub use store::Catalogue;
