//! Index context with parking_lot locks
//!
//! One explicit object owns every index instance; callers share it as
//! `Arc<IndexContext>` instead of reaching for process-wide statics.
//!
//! Locking:
//! - trie and ordered sets: `RwLock` (parallel reads, exclusive writes)
//! - caches: `Mutex`, since a cache read promotes the entry and bumps counters
//! - when several are held at once the order is trie, recipes, ingredients;
//!   a cache lock is never held together with another lock

use super::lru::LruCache;
use super::ordered::OrderedIndexSet;
use super::trie::TrieIndex;
use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::event::{EventBus, IndexEvent};
use crate::models::{normalize_name, EntityClass, Indexed, Ingredient, Recipe};
use chrono::{Local, NaiveDate};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, trace};

/// Ordered indexes and cache for one entity class
pub struct ClassIndex<T> {
    pub(super) ordered: RwLock<OrderedIndexSet<T>>,
    pub(super) cache: Mutex<LruCache<String, Arc<T>>>,
}

impl<T: Indexed> ClassIndex<T> {
    fn new(cache_capacity: usize) -> Result<Self, IndexError> {
        Ok(Self {
            ordered: RwLock::new(OrderedIndexSet::new()),
            cache: Mutex::new(LruCache::new(T::CLASS.as_str(), cache_capacity)?),
        })
    }
}

/// Entity types with a slot in the [`IndexContext`]
pub trait Catalogued: Indexed + Sized {
    fn class_index(ctx: &IndexContext) -> &ClassIndex<Self>;
}

impl Catalogued for Recipe {
    fn class_index(ctx: &IndexContext) -> &ClassIndex<Self> {
        &ctx.recipes
    }
}

impl Catalogued for Ingredient {
    fn class_index(ctx: &IndexContext) -> &ClassIndex<Self> {
        &ctx.ingredients
    }
}

/// Owner of the trie, caches and ordered indexes
///
/// Thread-safe; all operations are synchronous and never block on I/O.
pub struct IndexContext {
    pub(super) config: IndexConfig,
    pub(super) trie: RwLock<TrieIndex>,
    pub(super) recipes: ClassIndex<Recipe>,
    pub(super) ingredients: ClassIndex<Ingredient>,
    pub(super) event_bus: EventBus,
    /// Date bucket for entities without a creation date
    pub(super) today: fn() -> NaiveDate,
}

impl IndexContext {
    /// Create an empty context
    ///
    /// Fails with [`IndexError::CapacityViolation`] if a cache capacity is 0.
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        config.validate()?;

        Ok(Self {
            trie: RwLock::new(TrieIndex::new()),
            recipes: ClassIndex::new(config.recipe_cache_capacity)?,
            ingredients: ClassIndex::new(config.ingredient_cache_capacity)?,
            event_bus: EventBus::from_config(&config),
            today: || Local::now().date_naive(),
            config,
        })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(IndexConfig::default())
            .unwrap_or_else(|e| unreachable!("default index config is valid: {e}"))
    }

    /// Override the clock used for undated entities
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Get the event bus for subscribing to index activity
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) fn today(&self) -> NaiveDate {
        (self.today)()
    }

    // ===================
    // Write path
    // ===================

    /// Push one entity into the trie and the ordered indexes
    ///
    /// Blank names are ignored. The cache is not touched.
    pub fn insert<T: Catalogued>(&self, entity: Arc<T>) {
        let name = entity.name().to_string();
        if normalize_name(&name).is_empty() {
            debug!(class = %T::CLASS, "Ignoring entity with blank name");
            return;
        }

        let frequency = self.trie.write().insert(T::CLASS, &name);
        T::class_index(self)
            .ordered
            .write()
            .insert(entity, self.today());

        trace!(class = %T::CLASS, name = %name, frequency, "Entity indexed");
        self.event_bus.publish(IndexEvent::EntityIndexed {
            class: T::CLASS,
            name,
        });
    }

    // ===================
    // Autocomplete
    // ===================

    /// Up to `max_results` names starting with `prefix`, most frequent first
    pub fn complete(&self, class: EntityClass, prefix: &str, max_results: usize) -> Vec<String> {
        self.trie.read().complete(class, prefix, max_results)
    }

    /// [`complete`](Self::complete) with the configured completion limit
    pub fn suggest(&self, class: EntityClass, prefix: &str) -> Vec<String> {
        self.complete(class, prefix, self.config.completion_limit)
    }

    pub fn word_frequency(&self, class: EntityClass, word: &str) -> u64 {
        self.trie.read().word_frequency(class, word)
    }

    // ===================
    // Cache
    // ===================

    /// Cached handle for `name`, promoting it on hit
    pub fn cache_get<T: Catalogued>(&self, name: &str) -> Option<Arc<T>> {
        T::class_index(self)
            .cache
            .lock()
            .get(normalize_name(name).as_str())
            .cloned()
    }

    /// Cache a handle under `name`, evicting the coldest entry when full
    pub fn cache_put<T: Catalogued>(&self, name: &str, entity: Arc<T>) {
        let key = normalize_name(name);
        if key.is_empty() {
            return;
        }

        let evicted = T::class_index(self).cache.lock().put(key, entity);
        if let Some((key, _)) = evicted {
            debug!(class = %T::CLASS, key = %key, "Cache eviction");
            self.event_bus.publish(IndexEvent::CacheEvicted {
                class: T::CLASS,
                key,
            });
        }
    }

    /// Drop a cached handle; returns whether one was present
    pub fn cache_remove<T: Catalogued>(&self, name: &str) -> bool {
        T::class_index(self)
            .cache
            .lock()
            .remove(normalize_name(name).as_str())
            .is_some()
    }

    // ===================
    // Ordered queries
    // ===================

    /// Indexed handle for `name` (may be stale)
    pub fn lookup<T: Catalogued>(&self, name: &str) -> Option<Arc<T>> {
        T::class_index(self).ordered.read().get(name)
    }

    pub fn by_rating_range<T: Catalogued>(&self, min: f64, max: f64) -> Vec<Arc<T>> {
        T::class_index(self).ordered.read().range_by_rating(min, max)
    }

    pub fn by_date_range<T: Catalogued>(&self, start: NaiveDate, end: NaiveDate) -> Vec<Arc<T>> {
        T::class_index(self).ordered.read().range_by_date(start, end)
    }

    pub fn top_rated<T: Catalogued>(&self, n: usize) -> Vec<Arc<T>> {
        T::class_index(self).ordered.read().top_rated(n)
    }

    pub fn by_name_prefix<T: Catalogued>(&self, prefix: &str) -> Vec<Arc<T>> {
        T::class_index(self).ordered.read().by_prefix(prefix)
    }

    pub fn all_sorted_by_name<T: Catalogued>(&self) -> Vec<Arc<T>> {
        T::class_index(self).ordered.read().all_sorted_by_name()
    }

    pub fn all_by_date<T: Catalogued>(&self) -> Vec<Arc<T>> {
        T::class_index(self).ordered.read().all_by_date()
    }

    pub fn all_by_rating<T: Catalogued>(&self) -> Vec<Arc<T>> {
        T::class_index(self).ordered.read().all_by_rating()
    }
}

impl Default for IndexContext {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn context() -> IndexContext {
        IndexContext::with_defaults().with_clock(|| NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn rated(name: &str, rating: u8) -> Arc<Recipe> {
        Arc::new(Recipe::new(name).with_ratings(vec![rating]))
    }

    fn names<T: Indexed>(entities: &[Arc<T>]) -> Vec<&str> {
        entities.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_zero_capacity_rejected_at_construction() {
        let config = IndexConfig {
            recipe_cache_capacity: 0,
            ..IndexConfig::default()
        };
        assert!(matches!(
            IndexContext::new(config),
            Err(IndexError::CapacityViolation { .. })
        ));
    }

    #[test]
    fn test_concrete_scenario() {
        let ctx = context();
        ctx.insert(rated("Pasta", 4));
        ctx.insert(rated("Pizza", 5));
        ctx.insert(rated("Risotto", 3));

        assert_eq!(names(&ctx.top_rated::<Recipe>(2)), vec!["Pizza", "Pasta"]);
        assert_eq!(
            names(&ctx.by_rating_range::<Recipe>(3.0, 4.0)),
            vec!["Pasta", "Risotto"]
        );
        assert_eq!(names(&ctx.by_name_prefix::<Recipe>("Pi")), vec!["Pizza"]);
        assert_eq!(ctx.complete(EntityClass::Recipe, "p", 5), vec!["pasta", "pizza"]);
    }

    #[test]
    fn test_insert_feeds_trie_frequency() {
        let ctx = context();
        ctx.insert(rated("Ramen", 4));
        ctx.insert(rated("ramen", 5));

        assert_eq!(ctx.word_frequency(EntityClass::Recipe, "RAMEN"), 2);
        assert_eq!(ctx.all_sorted_by_name::<Recipe>().len(), 1);
    }

    #[test]
    fn test_classes_do_not_mix() {
        let ctx = context();
        ctx.insert(Arc::new(Ingredient::new("Spinach", 2)));
        ctx.insert(Arc::new(Recipe::new("Spaghetti")));

        assert_eq!(names(&ctx.by_name_prefix::<Ingredient>("sp")), vec!["Spinach"]);
        assert_eq!(names(&ctx.by_name_prefix::<Recipe>("sp")), vec!["Spaghetti"]);
        assert!(ctx.complete(EntityClass::Ingredient, "spa", 5).is_empty());
    }

    #[test]
    fn test_undated_entities_use_clock() {
        let ctx = context();
        ctx.insert(Arc::new(Recipe::new("Dated").with_created_on(march(1))));
        ctx.insert(Arc::new(Recipe::new("Undated")));

        assert_eq!(
            names(&ctx.by_date_range::<Recipe>(march(15), march(15))),
            vec!["Undated"]
        );
        assert_eq!(names(&ctx.all_by_date::<Recipe>()), vec!["Dated", "Undated"]);
    }

    #[test]
    fn test_cache_roundtrip_and_eviction_event() {
        let config = IndexConfig {
            recipe_cache_capacity: 1,
            ..IndexConfig::default()
        };
        let ctx = IndexContext::new(config).unwrap();
        let mut rx = ctx.event_bus().subscribe();

        ctx.cache_put("Pasta", rated("Pasta", 4));
        assert_eq!(ctx.cache_get::<Recipe>("pasta").unwrap().name, "Pasta");
        assert!(ctx.cache_get::<Ingredient>("pasta").is_none());

        ctx.cache_put("Pizza", rated("Pizza", 5));
        assert!(ctx.cache_get::<Recipe>("Pasta").is_none());

        assert_eq!(
            rx.try_recv().unwrap(),
            IndexEvent::CacheEvicted {
                class: EntityClass::Recipe,
                key: "pasta".to_string()
            }
        );
    }

    #[test]
    fn test_cache_remove() {
        let ctx = context();
        ctx.cache_put("Pasta", rated("Pasta", 4));
        assert!(ctx.cache_remove::<Recipe>("PASTA"));
        assert!(!ctx.cache_remove::<Recipe>("PASTA"));
    }

    #[test]
    fn test_blank_insert_is_ignored() {
        let ctx = context();
        let mut rx = ctx.event_bus().subscribe();
        ctx.insert(Arc::new(Recipe::new("  ")));

        assert!(ctx.all_sorted_by_name::<Recipe>().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_suggest_uses_configured_limit() {
        let config = IndexConfig {
            completion_limit: 2,
            ..IndexConfig::default()
        };
        let ctx = IndexContext::new(config).unwrap();
        for name in ["Bagel", "Bun", "Brioche", "Baguette"] {
            ctx.insert(Arc::new(Recipe::new(name)));
        }

        assert_eq!(ctx.suggest(EntityClass::Recipe, "b").len(), 2);
    }
}
