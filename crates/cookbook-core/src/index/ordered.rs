//! Order-maintaining indexes over one entity class
//!
//! Three `BTreeMap`s keep entities sorted as they are added, so alphabetical,
//! date-range and rating-range queries are ordered walks instead of sorts:
//!
//! - by name: unique, keyed by normalized name, last write wins
//! - by date: buckets keyed by calendar day
//! - by rating: buckets keyed by the average rating *at insertion time*
//!
//! Re-inserting a name moves it: the handle it replaces is taken out of its
//! date and rating buckets, so every name sits in at most one bucket of each.
//! Entities removed from the store are not removed here; that waits for the
//! next rebuild.

use crate::models::{normalize_name, Indexed};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

/// Totally ordered rating key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingKey(f64);

impl RatingKey {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Eq for RatingKey {}

impl Ord for RatingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for RatingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// By-name entry, remembering the date bucket it was filed under
#[derive(Debug)]
struct Named<T> {
    entity: Arc<T>,
    date: NaiveDate,
}

/// Take `entity` out of the bucket at `key`, dropping the bucket once empty
fn unbucket<K: Ord, T>(buckets: &mut BTreeMap<K, Vec<Arc<T>>>, key: &K, entity: &Arc<T>) {
    if let Some(bucket) = buckets.get_mut(key) {
        bucket.retain(|e| !Arc::ptr_eq(e, entity));
        if bucket.is_empty() {
            buckets.remove(key);
        }
    }
}

fn rating_key(rating: f64) -> Option<RatingKey> {
    if rating.is_nan() || rating <= 0.0 {
        None
    } else {
        Some(RatingKey(rating))
    }
}

/// Name, date and rating indexes for one entity class
#[derive(Debug)]
pub struct OrderedIndexSet<T> {
    by_name: BTreeMap<String, Named<T>>,
    by_date: BTreeMap<NaiveDate, Vec<Arc<T>>>,
    by_rating: BTreeMap<RatingKey, Vec<Arc<T>>>,
}

impl<T> Default for OrderedIndexSet<T> {
    fn default() -> Self {
        Self {
            by_name: BTreeMap::new(),
            by_date: BTreeMap::new(),
            by_rating: BTreeMap::new(),
        }
    }
}

impl<T: Indexed> OrderedIndexSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to all three indexes, replacing any entry of the same
    /// name
    ///
    /// `today` is used as the date bucket when the entity carries no
    /// creation date. Blank names are ignored.
    pub fn insert(&mut self, entity: Arc<T>, today: NaiveDate) -> bool {
        if normalize_name(entity.name()).is_empty() {
            return false;
        }
        let date = entity.created_on().unwrap_or(today);
        if let Some(previous) = self.add_name(Arc::clone(&entity), date) {
            self.unbucket_replaced(&previous);
        }
        self.add_to_date_bucket(Arc::clone(&entity), date);
        self.add_to_rating_bucket(entity);
        true
    }

    /// Insert or overwrite the by-name entry, returning the replaced one
    fn add_name(&mut self, entity: Arc<T>, date: NaiveDate) -> Option<Named<T>> {
        self.by_name
            .insert(normalize_name(entity.name()), Named { entity, date })
    }

    fn add_to_date_bucket(&mut self, entity: Arc<T>, date: NaiveDate) {
        self.by_date.entry(date).or_default().push(entity);
    }

    /// Bucket under the current average rating; unrated entities are skipped
    fn add_to_rating_bucket(&mut self, entity: Arc<T>) -> bool {
        let Some(key) = rating_key(entity.average_rating()) else {
            return false;
        };
        self.by_rating.entry(key).or_default().push(entity);
        true
    }

    fn unbucket_replaced(&mut self, previous: &Named<T>) {
        unbucket(&mut self.by_date, &previous.date, &previous.entity);
        if let Some(key) = rating_key(previous.entity.average_rating()) {
            unbucket(&mut self.by_rating, &key, &previous.entity);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.by_name
            .get(&normalize_name(name))
            .map(|named| Arc::clone(&named.entity))
    }

    /// Entities rated within `[min, max]`, highest rating first
    pub fn range_by_rating(&self, min: f64, max: f64) -> Vec<Arc<T>> {
        if min.is_nan() || max.is_nan() || min > max {
            return Vec::new();
        }

        let mut matched: Vec<&Vec<Arc<T>>> = Vec::new();
        for (rating, bucket) in &self.by_rating {
            if rating.0 > max {
                break;
            }
            if rating.0 >= min {
                matched.push(bucket);
            }
        }

        matched.into_iter().rev().flatten().cloned().collect()
    }

    /// Entities dated within `[start, end]`, oldest first
    pub fn range_by_date(&self, start: NaiveDate, end: NaiveDate) -> Vec<Arc<T>> {
        if start > end {
            return Vec::new();
        }
        self.by_date
            .range(start..=end)
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }

    /// The `n` best-rated entities, highest first
    pub fn top_rated(&self, n: usize) -> Vec<Arc<T>> {
        let mut top = Vec::with_capacity(n.min(self.by_name.len()));
        for bucket in self.by_rating.values().rev() {
            if top.len() >= n {
                break;
            }
            top.extend(bucket.iter().cloned());
        }
        top.truncate(n);
        top
    }

    /// Entities whose normalized name starts with `prefix`, in name order
    pub fn by_prefix(&self, prefix: &str) -> Vec<Arc<T>> {
        let prefix = normalize_name(prefix);
        self.by_name
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(name, _)| name.starts_with(&prefix))
            .map(|(_, named)| Arc::clone(&named.entity))
            .collect()
    }

    pub fn all_sorted_by_name(&self) -> Vec<Arc<T>> {
        self.by_name
            .values()
            .map(|named| Arc::clone(&named.entity))
            .collect()
    }

    pub fn all_by_date(&self) -> Vec<Arc<T>> {
        self.by_date.values().flatten().cloned().collect()
    }

    /// Every rated entity, lowest rating first
    pub fn all_by_rating(&self) -> Vec<Arc<T>> {
        self.by_rating.values().flatten().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
        self.by_date.clear();
        self.by_rating.clear();
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn date_bucket_count(&self) -> usize {
        self.by_date.len()
    }

    pub fn dated_entry_count(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }

    pub fn rating_bucket_count(&self) -> usize {
        self.by_rating.len()
    }

    pub fn rated_entry_count(&self) -> usize {
        self.by_rating.values().map(Vec::len).sum()
    }
}
