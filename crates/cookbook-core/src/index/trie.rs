//! Prefix trie for name autocomplete
//!
//! One root per [`EntityClass`]. Keys are normalized (trimmed, lowercased)
//! before insertion and lookup, and every terminal node counts how many times
//! its word was inserted.
//!
//! Completion ranks the whole subtree under the prefix by frequency, keeping
//! only the best `max_results` candidates in a bounded min-heap, so a popular
//! word deep in the subtree is never shadowed by an earlier, rarer one.

use crate::models::{normalize_name, EntityClass};
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// Set only on terminal nodes; equals the path from the root
    word: Option<String>,
    frequency: u64,
}

impl TrieNode {
    fn is_terminal(&self) -> bool {
        self.word.is_some()
    }

    fn descend(&self, key: &str) -> Option<&TrieNode> {
        key.chars().try_fold(self, |node, ch| node.children.get(&ch))
    }

    /// Iterative pre-order walk over this subtree
    fn walk(&self) -> impl Iterator<Item = &TrieNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.values().rev());
            Some(node)
        })
    }
}

/// Completion candidate; `Greater` means a better suggestion
#[derive(Debug, PartialEq, Eq)]
struct Candidate<'a> {
    frequency: u64,
    word: &'a str,
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frequency
            .cmp(&other.frequency)
            .then_with(|| other.word.cmp(self.word))
    }
}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Prefix trie with one root per entity class
#[derive(Debug, Default)]
pub struct TrieIndex {
    recipes: TrieNode,
    ingredients: TrieNode,
}

impl TrieIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn root(&self, class: EntityClass) -> &TrieNode {
        match class {
            EntityClass::Recipe => &self.recipes,
            EntityClass::Ingredient => &self.ingredients,
        }
    }

    fn root_mut(&mut self, class: EntityClass) -> &mut TrieNode {
        match class {
            EntityClass::Recipe => &mut self.recipes,
            EntityClass::Ingredient => &mut self.ingredients,
        }
    }

    /// Insert a word, bumping its frequency. Returns the new frequency
    /// (0 when the word is blank and was ignored).
    pub fn insert(&mut self, class: EntityClass, word: &str) -> u64 {
        self.insert_count(class, word, 1)
    }

    /// Insert a word `count` times at once
    pub fn insert_count(&mut self, class: EntityClass, word: &str, count: u64) -> u64 {
        let key = normalize_name(word);
        if key.is_empty() || count == 0 {
            return 0;
        }

        let mut node = self.root_mut(class);
        for ch in key.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.frequency += count;
        node.word = Some(key);
        node.frequency
    }

    pub fn contains(&self, class: EntityClass, word: &str) -> bool {
        self.word_frequency(class, word) > 0
    }

    /// Frequency of an exact word, 0 when absent or only a prefix
    pub fn word_frequency(&self, class: EntityClass, word: &str) -> u64 {
        let key = normalize_name(word);
        if key.is_empty() {
            return 0;
        }
        self.root(class)
            .descend(&key)
            .filter(|node| node.is_terminal())
            .map_or(0, |node| node.frequency)
    }

    /// Up to `max_results` words starting with `prefix`, most frequent first
    ///
    /// Ties are broken alphabetically. An empty prefix ranks every word of
    /// the class.
    pub fn complete(&self, class: EntityClass, prefix: &str, max_results: usize) -> Vec<String> {
        if max_results == 0 {
            return Vec::new();
        }

        let key = normalize_name(prefix);
        let Some(start) = self.root(class).descend(&key) else {
            return Vec::new();
        };

        // Min-heap of the best `max_results` candidates seen so far
        let mut best: BinaryHeap<Reverse<Candidate<'_>>> = BinaryHeap::new();
        for node in start.walk() {
            let Some(word) = node.word.as_deref() else {
                continue;
            };
            best.push(Reverse(Candidate {
                frequency: node.frequency,
                word,
            }));
            if best.len() > max_results {
                best.pop();
            }
        }

        best.into_sorted_vec()
            .into_iter()
            .map(|Reverse(candidate)| candidate.word.to_string())
            .collect()
    }

    /// Number of nodes under the class root, root included
    pub fn node_count(&self, class: EntityClass) -> usize {
        self.root(class).walk().count()
    }

    /// Number of distinct words stored for the class
    pub fn word_count(&self, class: EntityClass) -> usize {
        self.root(class).walk().filter(|n| n.is_terminal()).count()
    }

    /// Drop every word of one class
    pub fn clear(&mut self, class: EntityClass) {
        *self.root_mut(class) = TrieNode::default();
    }
}
