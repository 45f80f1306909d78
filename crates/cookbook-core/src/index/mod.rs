//! Derived indexing and caching layer in front of the catalogue
//!
//! Everything here is rebuildable from the canonical store:
//! - [`TrieIndex`]: ranked name autocomplete per entity class
//! - [`LruCache`]: bounded hot-lookup cache of entity handles
//! - [`OrderedIndexSet`]: name/date/rating ordered indexes
//! - [`IndexContext`]: owns one of each behind per-structure locks
//!
//! Results are hints. An entity removed from the catalogue stays visible in
//! the ordered indexes until the next [`IndexContext::rebuild`].

pub mod context;
pub mod lru;
pub mod ordered;
pub mod stats;
pub mod sync;
pub mod trie;

pub use context::{Catalogued, ClassIndex, IndexContext};
pub use lru::{CacheStats, LruCache};
pub use ordered::{OrderedIndexSet, RatingKey};
pub use stats::{ClassStats, IndexStats};
pub use sync::RebuildSummary;
pub use trie::TrieIndex;
