//! Keyed get-or-compute store used to memoize dataset loads.
//!
//! The cache is an explicit value handed to whoever needs it, so tests can
//! build a fresh one, inspect it and invalidate entries. Entries are keyed by
//! the path as given and are not refreshed when the file changes on disk;
//! call [`MemoCache::invalidate`] to force a reload.

use super::error::Result;
use super::loader::DataLoader;
use super::table::LoadedTable;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Thread-safe memo table. Values are shared as `Arc<V>` and never mutated.
///
/// Concurrent first callers for the same key may both compute; the first to
/// store wins and every caller receives that stored value.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, V> MemoCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.read().get(key).cloned()
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    /// A failed computation stores nothing.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        compute: impl FnOnce(&K) -> std::result::Result<V, E>,
    ) -> std::result::Result<Arc<V>, E> {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        let value = Arc::new(compute(&key)?);
        let mut entries = self.write();
        Ok(Arc::clone(entries.entry(key).or_insert(value)))
    }

    /// Drop one entry; returns whether it was present.
    pub fn invalidate(&self, key: &K) -> bool {
        self.write().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry: values
    // are fully built before insertion.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, Arc<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, Arc<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Loaded datasets keyed by input path.
pub type TableCache = MemoCache<PathBuf, LoadedTable>;

/// Load `path` through `cache`, reading the file only on the first request.
pub fn load_cached(cache: &TableCache, path: impl AsRef<Path>) -> Result<Arc<LoadedTable>> {
    let key = path.as_ref().to_path_buf();
    if let Some(hit) = cache.get(&key) {
        debug!(path = %key.display(), "dataset cache hit");
        return Ok(hit);
    }
    cache.get_or_try_insert_with(key, |path| DataLoader::load(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn computes_once_per_key() {
        let cache: MemoCache<String, usize> = MemoCache::new();
        let calls = AtomicUsize::new(0);
        let compute = |key: &String| -> std::result::Result<usize, ()> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(key.len())
        };

        let first = cache.get_or_try_insert_with("abc".to_string(), compute).unwrap();
        let second = cache.get_or_try_insert_with("abc".to_string(), compute).unwrap();

        assert_eq!(*first, 3);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache: MemoCache<u32, u32> = MemoCache::new();
        let err = cache.get_or_try_insert_with(1, |_| Err::<u32, _>("boom"));
        assert_eq!(err.unwrap_err(), "boom");
        assert!(cache.is_empty());

        let ok = cache.get_or_try_insert_with(1, |k| Ok::<_, &str>(k + 1)).unwrap();
        assert_eq!(*ok, 2);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let cache: MemoCache<u32, u32> = MemoCache::new();
        cache.get_or_try_insert_with(7, |_| Ok::<_, ()>(1)).unwrap();
        assert!(cache.invalidate(&7));
        assert!(!cache.invalidate(&7));

        let value = cache.get_or_try_insert_with(7, |_| Ok::<_, ()>(2)).unwrap();
        assert_eq!(*value, 2);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.get(&7).is_none());
    }

    #[test]
    fn first_stored_value_wins() {
        let cache: MemoCache<u32, u32> = MemoCache::new();
        let stored = cache
            .get_or_try_insert_with(1, |_| {
                // Another caller stores while this one is still computing.
                cache.get_or_try_insert_with(1, |_| Ok::<_, ()>(10)).unwrap();
                Ok::<_, ()>(20)
            })
            .unwrap();
        assert_eq!(*stored, 10);
    }
}
