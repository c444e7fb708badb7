//! # Keyed Cache
//!
//! Per-parent lists of records, used to remember each restaurant's menu
//! items after the first fetch.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  restaurant 3  ──►  [ newest item, ..., oldest item ]                  │
//! │  restaurant 7  ──►  [ ]            (fetched, empty menu)               │
//! │  restaurant 9  ──►  (absent)       (never fetched)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An empty list and an absent key are different things: the first means
//! "fetched, nothing there", the second "not fetched yet".

use std::collections::HashMap;
use std::hash::Hash;

/// Lists of values grouped by key, newest first.
#[derive(Debug, Clone)]
pub struct KeyedCache<K, V> {
    entries: HashMap<K, Vec<V>>,
}

impl<K, V> Default for KeyedCache<K, V> {
    fn default() -> Self {
        KeyedCache {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> KeyedCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly fetched list, replacing whatever was there.
    pub fn replace(&mut self, key: K, values: Vec<V>) {
        self.entries.insert(key, values);
    }

    /// Puts a newly created value at the front of its list.
    ///
    /// Creates the list if the key was never fetched.
    pub fn prepend(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().insert(0, value);
    }

    /// Returns the cached list, or `None` if the key was never filled.
    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Forgets every key.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_versus_empty() {
        let mut cache: KeyedCache<u32, &str> = KeyedCache::new();
        assert!(cache.get(&1).is_none());
        assert!(!cache.contains(&1));

        cache.replace(1, vec![]);
        assert_eq!(cache.get(&1), Some(&[][..]));
        assert!(cache.contains(&1));
    }

    #[test]
    fn test_replace_overwrites() {
        let mut cache = KeyedCache::new();
        cache.replace("a", vec![1, 2]);
        cache.replace("a", vec![3]);
        assert_eq!(cache.get(&"a"), Some(&[3][..]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut cache = KeyedCache::new();
        cache.replace(3, vec!["old"]);
        cache.prepend(3, "new");
        assert_eq!(cache.get(&3), Some(&["new", "old"][..]));
    }

    #[test]
    fn test_prepend_creates_missing_key() {
        let mut cache = KeyedCache::new();
        cache.prepend(9, "first");
        assert_eq!(cache.get(&9), Some(&["first"][..]));
    }

    #[test]
    fn test_clear() {
        let mut cache = KeyedCache::new();
        cache.replace(1, vec!['x']);
        cache.replace(2, vec!['y']);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&1).is_none());
    }
}
