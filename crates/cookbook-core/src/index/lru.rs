//! Fixed-capacity LRU cache
//!
//! Entries live in an arena (`Vec<Slot>`) and are linked into an access-order
//! list by slot index, so promotion and eviction are O(1) without raw
//! pointers. A side table maps each key to its slot.
//!
//! Invariant: a key is in `slots_by_key` iff its slot is linked exactly once
//! into the list between `head` (most recent) and `tail` (least recent).

use crate::error::IndexError;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    last_accessed: Instant,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Snapshot of cache metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub len: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// `hits / (hits + misses)`, 0.0 before the first lookup
    pub hit_rate: f64,
}

/// Least-recently-used cache with O(1) `get`/`put`
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    slots: Vec<Option<Entry<K, V>>>,
    free: Vec<usize>,
    slots_by_key: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache holding at most `capacity` entries
    ///
    /// A zero capacity is rejected with [`IndexError::CapacityViolation`].
    pub fn new(name: &str, capacity: usize) -> Result<Self, IndexError> {
        if capacity == 0 {
            return Err(IndexError::capacity(name, capacity));
        }
        Ok(Self {
            capacity,
            slots: Vec::new(),
            free: Vec::new(),
            slots_by_key: HashMap::new(),
            head: None,
            tail: None,
            hits: 0,
            misses: 0,
            evictions: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.slots_by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots_by_key.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn entry(&self, idx: usize) -> &Entry<K, V> {
        self.slots[idx]
            .as_ref()
            .unwrap_or_else(|| unreachable!("slot {idx} is linked but empty"))
    }

    fn entry_mut(&mut self, idx: usize) -> &mut Entry<K, V> {
        self.slots[idx]
            .as_mut()
            .unwrap_or_else(|| unreachable!("slot {idx} is linked but empty"))
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let e = self.entry(idx);
            (e.prev, e.next)
        };
        match prev {
            Some(p) => self.entry_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.entry_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let e = self.entry_mut(idx);
            e.prev = None;
            e.next = old_head;
        }
        match old_head {
            Some(h) => self.entry_mut(h).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn promote(&mut self, idx: usize) {
        self.entry_mut(idx).last_accessed = Instant::now();
        if self.head != Some(idx) {
            self.unlink(idx);
            self.push_front(idx);
        }
    }

    fn release(&mut self, idx: usize) -> Entry<K, V> {
        self.unlink(idx);
        self.free.push(idx);
        self.slots[idx]
            .take()
            .unwrap_or_else(|| unreachable!("slot {idx} is linked but empty"))
    }

    /// Look up a value, promoting it to most recently used
    ///
    /// Counts a hit or a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.slots_by_key.get(key).copied() {
            Some(idx) => {
                self.hits += 1;
                self.promote(idx);
                Some(&self.entry(idx).value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up a value without touching recency or counters
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.slots_by_key.get(key)?;
        Some(&self.entry(idx).value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots_by_key.contains_key(key)
    }

    /// When `key` was last written or read through `get`
    pub fn last_accessed<Q>(&self, key: &Q) -> Option<Instant>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.slots_by_key.get(key)?;
        Some(self.entry(idx).last_accessed)
    }

    /// Insert or update a value, promoting it to most recently used
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.slots_by_key.get(&key) {
            self.entry_mut(idx).value = value;
            self.promote(idx);
            return None;
        }

        let evicted = if self.slots_by_key.len() >= self.capacity {
            self.pop_lru()
        } else {
            None
        };

        let entry = Entry {
            key: key.clone(),
            value,
            last_accessed: Instant::now(),
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.push_front(idx);
        self.slots_by_key.insert(key, idx);

        evicted
    }

    fn pop_lru(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        let entry = self.release(idx);
        self.slots_by_key.remove(&entry.key);
        self.evictions += 1;
        Some((entry.key, entry.value))
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.slots_by_key.remove(key)?;
        Some(self.release(idx).value)
    }

    /// Drop every entry; hit/miss/eviction counters are kept
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.slots_by_key.clear();
        self.head = None;
        self.tail = None;
    }

    /// Entries from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let e = self.entry(cursor?);
            cursor = e.next;
            Some((&e.key, &e.value))
        })
    }

    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        };
        CacheStats {
            len: self.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate,
        }
    }
}
