//! Read-only index statistics
//!
//! Trie counts come from a full traversal, so `stats()` is O(n) in the number
//! of trie nodes. Locks are taken one at a time.

use super::context::{Catalogued, IndexContext};
use super::lru::CacheStats;
use crate::models::{EntityClass, Ingredient, Recipe};
use serde::Serialize;

/// Counts for one entity class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStats {
    pub class: EntityClass,
    pub trie_nodes: usize,
    pub trie_words: usize,
    pub cache: CacheStats,
    pub names: usize,
    pub date_buckets: usize,
    pub dated_entries: usize,
    pub rating_buckets: usize,
    pub rated_entries: usize,
}

/// Snapshot of the whole index layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub recipes: ClassStats,
    pub ingredients: ClassStats,
}

impl IndexStats {
    pub fn class(&self, class: EntityClass) -> &ClassStats {
        match class {
            EntityClass::Recipe => &self.recipes,
            EntityClass::Ingredient => &self.ingredients,
        }
    }

    pub fn total_names(&self) -> usize {
        self.recipes.names + self.ingredients.names
    }
}

impl IndexContext {
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            recipes: self.class_stats::<Recipe>(),
            ingredients: self.class_stats::<Ingredient>(),
        }
    }

    fn class_stats<T: Catalogued>(&self) -> ClassStats {
        let class = T::CLASS;
        let (trie_nodes, trie_words) = {
            let trie = self.trie.read();
            (trie.node_count(class), trie.word_count(class))
        };

        let slot = T::class_index(self);
        let cache = slot.cache.lock().stats();
        let ordered = slot.ordered.read();

        ClassStats {
            class,
            trie_nodes,
            trie_words,
            cache,
            names: ordered.len(),
            date_buckets: ordered.date_bucket_count(),
            dated_entries: ordered.dated_entry_count(),
            rating_buckets: ordered.rating_bucket_count(),
            rated_entries: ordered.rated_entry_count(),
        }
    }
}
