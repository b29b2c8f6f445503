use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use super::CircularQueue;

/// Capacity-bounded memo table with first-in-first-out eviction.
///
/// Keys are remembered in insertion order by a [`CircularQueue`]; once the
/// table reaches capacity, inserting a new key evicts the oldest one. The
/// cache performs no locking of its own; owners that share it across
/// threads must guard it externally.
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    order: CircularQueue<K>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is not greater than one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: CircularQueue::new(capacity),
            capacity,
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Insert a value, evicting the oldest entry when a new key would
    /// exceed the capacity.
    pub fn insert(&mut self, key: K, value: V) {
        if !self.entries.contains_key(&key) {
            if self.entries.len() == self.capacity {
                let oldest = self.order.remove();
                self.entries.remove(&oldest);
            }
            self.order.add(key.clone());
        }

        self.entries.insert(key, value);
    }

    /// Return the cached value for `key`, computing and storing it on a
    /// miss. The closure runs at most once per cached key.
    pub fn compute_if_absent(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> V {
        if let Some(value) = self.entries.get(&key) {
            return value.clone();
        }

        let value = compute(&key);
        self.insert(key, value.clone());
        value
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        while self.order.poll().is_some() {}
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_within_capacity_keeps_all() {
        let mut cache = BoundedCache::new(4);
        for i in 0..4 {
            cache.insert(format!("k{i}"), i);
        }
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.get("k0"), Some(&0));
    }

    #[test]
    fn test_insert_past_capacity_evicts_oldest() {
        let mut cache = BoundedCache::new(3);
        for i in 0..5 {
            cache.insert(format!("k{i}"), i);
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("k0"), None);
        assert_eq!(cache.get("k1"), None);
        assert_eq!(cache.get("k4"), Some(&4));
    }

    #[test]
    fn test_reinsert_existing_key_does_not_evict() {
        let mut cache = BoundedCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        cache.insert("a", 10);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), Some(&10));
        assert_eq!(cache.get("b"), Some(&2));
    }

    #[test]
    fn test_compute_if_absent_runs_once_per_key() {
        let mut cache = BoundedCache::new(8);
        let mut calls = 0;

        let first = cache.compute_if_absent("1+1".to_string(), |_| {
            calls += 1;
            "2".to_string()
        });
        let second = cache.compute_if_absent("1+1".to_string(), |_| {
            calls += 1;
            "never".to_string()
        });

        assert_eq!(first, "2");
        assert_eq!(second, "2");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_clear_empties_entries_and_order() {
        let mut cache = BoundedCache::new(3);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.clear();

        assert!(cache.is_empty());

        // Eviction order restarts cleanly after a clear.
        for i in 0..4 {
            cache.insert(format!("k{i}"), i);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("k0"), None);
    }
}
