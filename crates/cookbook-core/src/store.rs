//! Canonical catalogue store with DashMap
//!
//! Owns the authoritative recipe and ingredient maps (per-entry locking) and
//! drives the index layer:
//! - write path: store, then index, then refresh the cached handle
//! - read path: cache first, store on miss, repopulating the cache
//! - bulk path: store everything, then one rebuild
//!
//! Writes, removals, rebuilds and cache refills on the read path take one
//! write gate, so a rebuild's store snapshot can never miss a concurrent
//! write and a refill never re-caches a handle removed meanwhile. Cache hits
//! and index queries do not take it.

use crate::config::IndexConfig;
use crate::error::{ImportReport, IndexError};
use crate::index::{IndexContext, RebuildSummary};
use crate::loader::CatalogueFile;
use crate::models::{normalize_name, EntityClass, Ingredient, Recipe};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Central catalogue of recipes and ingredients
///
/// Thread-safe. Index results returned through [`Catalogue::index`] are
/// hints: an entity removed here stays visible in the ordered indexes until
/// [`Catalogue::rebuild_indexes`] runs.
pub struct Catalogue {
    recipes: DashMap<String, Arc<Recipe>>,
    ingredients: DashMap<String, Arc<Ingredient>>,
    index: Arc<IndexContext>,
    write_gate: Mutex<()>,
}

impl Catalogue {
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        Ok(Self::with_index(Arc::new(IndexContext::new(config)?)))
    }

    /// Create around an existing index context
    pub fn with_index(index: Arc<IndexContext>) -> Self {
        Self {
            recipes: DashMap::new(),
            ingredients: DashMap::new(),
            index,
            write_gate: Mutex::new(()),
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::with_index(Arc::new(IndexContext::with_defaults()))
    }

    /// Shared handle to the index layer
    pub fn index(&self) -> &Arc<IndexContext> {
        &self.index
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    // ===================
    // Write path
    // ===================

    /// Add or replace a recipe; returns the stored handle
    ///
    /// Blank names are not stored.
    pub fn add_recipe(&self, recipe: Recipe) -> Option<Arc<Recipe>> {
        let key = normalize_name(&recipe.name);
        if key.is_empty() {
            warn!("Refusing recipe with blank name");
            return None;
        }

        let recipe = Arc::new(recipe);
        let _gate = self.write_gate.lock();
        self.recipes.insert(key, Arc::clone(&recipe));
        self.index.insert(Arc::clone(&recipe));
        self.index.cache_put(&recipe.name, Arc::clone(&recipe));
        Some(recipe)
    }

    /// Add or replace an ingredient; returns the stored handle
    pub fn add_ingredient(&self, ingredient: Ingredient) -> Option<Arc<Ingredient>> {
        let key = normalize_name(&ingredient.name);
        if key.is_empty() {
            warn!("Refusing ingredient with blank name");
            return None;
        }

        let ingredient = Arc::new(ingredient);
        let _gate = self.write_gate.lock();
        self.ingredients.insert(key, Arc::clone(&ingredient));
        self.index.insert(Arc::clone(&ingredient));
        self.index.cache_put(&ingredient.name, Arc::clone(&ingredient));
        Some(ingredient)
    }

    /// Remove a recipe from the store and the cache
    ///
    /// Ordered index entries survive until the next rebuild.
    pub fn remove_recipe(&self, name: &str) -> Option<Arc<Recipe>> {
        let _gate = self.write_gate.lock();
        let (_, removed) = self.recipes.remove(&normalize_name(name))?;
        self.index.cache_remove::<Recipe>(name);
        debug!(name = %removed.name, "Recipe removed");
        Some(removed)
    }

    pub fn remove_ingredient(&self, name: &str) -> Option<Arc<Ingredient>> {
        let _gate = self.write_gate.lock();
        let (_, removed) = self.ingredients.remove(&normalize_name(name))?;
        self.index.cache_remove::<Ingredient>(name);
        debug!(name = %removed.name, "Ingredient removed");
        Some(removed)
    }

    // ===================
    // Read path
    // ===================

    /// Recipe by name: cache first, then the store
    pub fn recipe(&self, name: &str) -> Option<Arc<Recipe>> {
        if let Some(hit) = self.index.cache_get::<Recipe>(name) {
            return Some(hit);
        }
        let _gate = self.write_gate.lock();
        let found = self
            .recipes
            .get(&normalize_name(name))
            .map(|r| Arc::clone(r.value()))?;
        self.index.cache_put(name, Arc::clone(&found));
        Some(found)
    }

    /// Ingredient by name: cache first, then the store
    pub fn ingredient(&self, name: &str) -> Option<Arc<Ingredient>> {
        if let Some(hit) = self.index.cache_get::<Ingredient>(name) {
            return Some(hit);
        }
        let _gate = self.write_gate.lock();
        let found = self
            .ingredients
            .get(&normalize_name(name))
            .map(|r| Arc::clone(r.value()))?;
        self.index.cache_put(name, Arc::clone(&found));
        Some(found)
    }

    /// Whether an index hit still exists in the store
    pub fn is_current(&self, class: EntityClass, name: &str) -> bool {
        let key = normalize_name(name);
        match class {
            EntityClass::Recipe => self.recipes.contains_key(&key),
            EntityClass::Ingredient => self.ingredients.contains_key(&key),
        }
    }

    /// Snapshot of every stored recipe, in name order
    pub fn recipes(&self) -> Vec<Arc<Recipe>> {
        let mut all: Vec<_> = self.recipes.iter().map(|r| Arc::clone(r.value())).collect();
        all.sort_by_cached_key(|r| normalize_name(&r.name));
        all
    }

    /// Snapshot of every stored ingredient, in name order
    pub fn ingredients(&self) -> Vec<Arc<Ingredient>> {
        let mut all: Vec<_> = self
            .ingredients
            .iter()
            .map(|r| Arc::clone(r.value()))
            .collect();
        all.sort_by_cached_key(|i| normalize_name(&i.name));
        all
    }

    // ===================
    // Bulk path
    // ===================

    /// Recompute the ordered indexes from the current store contents
    pub fn rebuild_indexes(&self) -> RebuildSummary {
        let _gate = self.write_gate.lock();
        self.rebuild_gated()
    }

    /// Rebuild with the write gate already held
    fn rebuild_gated(&self) -> RebuildSummary {
        self.index.rebuild(&self.recipes(), &self.ingredients())
    }

    /// Store every entity of a catalogue file, then rebuild once
    ///
    /// Entries with blank names are skipped and reported.
    pub fn import(&self, file: CatalogueFile) -> ImportReport {
        let mut report = ImportReport::new();
        let _gate = self.write_gate.lock();

        for (position, recipe) in file.recipes.into_iter().enumerate() {
            let key = normalize_name(&recipe.name);
            if key.is_empty() {
                report.add_warning(EntityClass::Recipe, position, "blank name, skipped");
                continue;
            }
            if self.recipes.insert(key, Arc::new(recipe)).is_some() {
                report.overwritten += 1;
            }
            report.recipes_imported += 1;
        }

        for (position, ingredient) in file.ingredients.into_iter().enumerate() {
            let key = normalize_name(&ingredient.name);
            if key.is_empty() {
                report.add_warning(EntityClass::Ingredient, position, "blank name, skipped");
                continue;
            }
            if self.ingredients.insert(key, Arc::new(ingredient)).is_some() {
                report.overwritten += 1;
            }
            report.ingredients_imported += 1;
        }

        for warning in &report.warnings {
            warn!(
                class = %warning.class,
                position = warning.position,
                message = %warning.message,
                "Import entry skipped"
            );
        }

        self.rebuild_gated();

        info!(
            recipes = report.recipes_imported,
            ingredients = report.ingredients_imported,
            overwritten = report.overwritten,
            skipped = report.warnings.len(),
            "Catalogue import complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_creation() {
        let catalogue = Catalogue::with_defaults();
        assert_eq!(catalogue.recipe_count(), 0);
        assert!(catalogue.recipe("anything").is_none());
    }

    #[test]
    fn test_zero_capacity_config_rejected() {
        let config = IndexConfig {
            ingredient_cache_capacity: 0,
            ..IndexConfig::default()
        };
        assert!(Catalogue::new(config).is_err());
    }

    #[test]
    fn test_add_then_read_hits_cache() {
        let catalogue = Catalogue::with_defaults();
        catalogue.add_recipe(Recipe::new("Pasta"));

        let found = catalogue.recipe("PASTA").unwrap();
        assert_eq!(found.name, "Pasta");

        let cache = catalogue.index().stats().recipes.cache;
        assert_eq!((cache.hits, cache.misses), (1, 0));
    }

    #[test]
    fn test_read_miss_repopulates_cache() {
        let catalogue = Catalogue::with_defaults();
        catalogue.add_recipe(Recipe::new("Pasta"));
        catalogue.index().cache_remove::<Recipe>("pasta");

        assert!(catalogue.recipe("pasta").is_some());
        assert!(catalogue.index().cache_get::<Recipe>("pasta").is_some());
    }

    #[test]
    fn test_update_overwrites() {
        let catalogue = Catalogue::with_defaults();
        catalogue.add_ingredient(Ingredient::new("Flour", 1));
        catalogue.add_ingredient(Ingredient::new("flour", 7));

        assert_eq!(catalogue.ingredient_count(), 1);
        assert_eq!(catalogue.ingredient("Flour").unwrap().quantity, 7);
    }

    #[test]
    fn test_blank_name_refused() {
        let catalogue = Catalogue::with_defaults();
        assert!(catalogue.add_recipe(Recipe::new(" ")).is_none());
        assert_eq!(catalogue.recipe_count(), 0);
    }

    #[test]
    fn test_remove_invalidates_cache_but_not_index() {
        let catalogue = Catalogue::with_defaults();
        catalogue.add_recipe(Recipe::new("Pasta").with_ratings(vec![4]));

        assert!(catalogue.remove_recipe("pasta").is_some());
        assert!(catalogue.recipe("pasta").is_none());
        assert!(!catalogue.is_current(EntityClass::Recipe, "Pasta"));
        assert_eq!(catalogue.index().top_rated::<Recipe>(5).len(), 1);
    }

    #[test]
    fn test_import_reports_and_rebuilds() {
        let catalogue = Catalogue::with_defaults();
        let file = CatalogueFile {
            recipes: vec![
                Recipe::new("Pasta").with_ratings(vec![4]),
                Recipe::new(""),
                Recipe::new("pasta").with_ratings(vec![5]),
            ],
            ingredients: vec![Ingredient::new("Salt", 3)],
        };

        let report = catalogue.import(file);

        assert_eq!(report.recipes_imported, 2);
        assert_eq!(report.ingredients_imported, 1);
        assert_eq!(report.overwritten, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].position, 1);

        let stats = catalogue.index().stats();
        assert_eq!(stats.recipes.names, 1);
        assert_eq!(stats.recipes.rated_entries, 1);
        assert_eq!(
            catalogue.index().top_rated::<Recipe>(1)[0].average_rating(),
            5.0
        );
    }
}
