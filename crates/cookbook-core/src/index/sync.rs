//! Rebuild of the derived indexes from the canonical store
//!
//! The only path that removes stale entries. Fresh index sets and a fresh
//! trie are built from the store snapshot and swapped in while every write
//! lock is held, so readers see either the old or the new state, never a
//! half-built one.
//!
//! Trie frequencies are carried over for names still in the snapshot; names
//! that left the store are pruned.

use super::context::IndexContext;
use super::ordered::OrderedIndexSet;
use super::trie::TrieIndex;
use crate::event::IndexEvent;
use crate::models::{EntityClass, Indexed, Ingredient, Recipe};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Outcome of [`IndexContext::rebuild`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebuildSummary {
    pub recipes: usize,
    pub ingredients: usize,
    /// Distinct names in the rebuilt trie
    pub trie_words: usize,
    /// Names dropped from the trie because they left the store
    pub trie_words_pruned: usize,
}

fn build_set<T: Indexed>(entities: &[Arc<T>], today: NaiveDate) -> OrderedIndexSet<T> {
    let mut set = OrderedIndexSet::new();
    for entity in entities {
        set.insert(Arc::clone(entity), today);
    }
    set
}

/// Re-insert the names of `entities` into `fresh`, keeping their old
/// frequency. Returns how many names were already in `old`.
fn carry_names<T: Indexed>(
    old: &TrieIndex,
    fresh: &mut TrieIndex,
    entities: &[Arc<T>],
) -> usize {
    let mut carried = 0;
    for entity in entities {
        if fresh.contains(T::CLASS, entity.name()) {
            continue;
        }
        let frequency = old.word_frequency(T::CLASS, entity.name());
        if frequency > 0 {
            carried += 1;
        }
        fresh.insert_count(T::CLASS, entity.name(), frequency.max(1));
    }
    carried
}

fn word_total(trie: &TrieIndex) -> usize {
    EntityClass::ALL
        .iter()
        .map(|&class| trie.word_count(class))
        .sum()
}

impl IndexContext {
    /// Discard the trie and ordered indexes and recompute them from
    /// `recipes` and `ingredients`
    ///
    /// Both caches are emptied as well, since they may hold handles to
    /// entity versions the store no longer has.
    pub fn rebuild(&self, recipes: &[Arc<Recipe>], ingredients: &[Arc<Ingredient>]) -> RebuildSummary {
        let start = Instant::now();
        let today = self.today();

        let recipe_set = build_set(recipes, today);
        let ingredient_set = build_set(ingredients, today);

        let summary = {
            let mut trie = self.trie.write();
            let mut fresh = TrieIndex::new();
            let carried = carry_names(&trie, &mut fresh, recipes)
                + carry_names(&trie, &mut fresh, ingredients);

            let summary = RebuildSummary {
                recipes: recipe_set.len(),
                ingredients: ingredient_set.len(),
                trie_words: word_total(&fresh),
                trie_words_pruned: word_total(&trie).saturating_sub(carried),
            };

            let mut recipe_index = self.recipes.ordered.write();
            let mut ingredient_index = self.ingredients.ordered.write();
            *trie = fresh;
            *recipe_index = recipe_set;
            *ingredient_index = ingredient_set;
            summary
        };

        self.recipes.cache.lock().clear();
        self.ingredients.cache.lock().clear();

        info!(
            recipes = summary.recipes,
            ingredients = summary.ingredients,
            trie_words = summary.trie_words,
            trie_words_pruned = summary.trie_words_pruned,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Indexes rebuilt"
        );
        self.event_bus.publish(IndexEvent::Rebuilt {
            recipes: summary.recipes,
            ingredients: summary.ingredients,
        });

        summary
    }
}
