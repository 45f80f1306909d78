//! Performance benchmarks for the index layer
//!
//! - trie completion over large vocabularies (bounded heap, k << n)
//! - LRU churn at capacity
//! - full rebuild from the catalogue

use cookbook_core::index::{IndexContext, LruCache, TrieIndex};
use cookbook_core::{EntityClass, Recipe};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

/// Generate synthetic recipe names sharing a few common prefixes
fn generate_names(count: usize) -> Vec<String> {
    const STEMS: [&str; 6] = ["pasta", "pizza", "pie", "soup", "salad", "stew"];
    (0..count)
        .map(|i| format!("{} {}", STEMS[i % STEMS.len()], i))
        .collect()
}

fn generate_recipes(count: usize) -> Vec<Arc<Recipe>> {
    generate_names(count)
        .into_iter()
        .enumerate()
        .map(|(i, name)| Arc::new(Recipe::new(name).with_ratings(vec![(i % 5 + 1) as u8])))
        .collect()
}

/// Benchmark 1: completion with varying vocabulary sizes
fn completion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_complete");

    for count in [100, 1_000, 10_000] {
        let mut trie = TrieIndex::new();
        for (i, name) in generate_names(count).iter().enumerate() {
            for _ in 0..(i % 3 + 1) {
                trie.insert(EntityClass::Recipe, name);
            }
        }
        group.bench_with_input(BenchmarkId::new("words", count), &trie, |b, trie| {
            b.iter(|| black_box(trie.complete(EntityClass::Recipe, black_box("p"), 10)));
        });
    }

    group.finish();
}

/// Benchmark 2: put/get churn on a full cache
fn lru_benchmark(c: &mut Criterion) {
    let keys = generate_names(4_096);
    c.bench_function("lru_churn_cap_256", |b| {
        b.iter(|| {
            let mut cache: LruCache<&str, usize> = LruCache::new("bench", 256).unwrap();
            for (i, key) in keys.iter().enumerate() {
                cache.put(key.as_str(), i);
                black_box(cache.get(keys[i / 2].as_str()));
            }
        });
    });
}

/// Benchmark 3: rebuild from a snapshot
fn rebuild_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    for count in [1_000, 10_000] {
        let recipes = generate_recipes(count);
        let ctx = IndexContext::with_defaults();
        group.bench_with_input(BenchmarkId::new("recipes", count), &recipes, |b, recipes| {
            b.iter(|| black_box(ctx.rebuild(recipes, &[])));
        });
    }

    group.finish();
}

criterion_group!(benches, completion_benchmark, lru_benchmark, rebuild_benchmark);
criterion_main!(benches);
