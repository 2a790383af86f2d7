//! Write-once boundary cache keyed by [`BoundaryKey`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tripmap_core::{BoundaryKey, Geometry};

/// Storage for resolved boundaries, shared across render passes.
///
/// A stored `None` is a real entry: it records that resolution already ran
/// for this key and found nothing, so it is never retried.
pub trait BoundaryCache: Send + Sync {
    /// `None` when the key has never been resolved, `Some(None)` when it was
    /// resolved to nothing.
    fn get(&self, key: &BoundaryKey) -> Option<Option<Geometry>>;

    /// Stores `geometry` under `key` unless an entry already exists.
    ///
    /// Returns `true` if the value was written.
    fn insert(&self, key: BoundaryKey, geometry: Option<Geometry>) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime cache backed by a `HashMap`. Entries are never evicted.
#[derive(Debug, Default)]
pub struct InMemoryBoundaryCache {
    entries: Mutex<HashMap<BoundaryKey, Option<Geometry>>>,
}

impl InMemoryBoundaryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<BoundaryKey, Option<Geometry>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BoundaryCache for InMemoryBoundaryCache {
    fn get(&self, key: &BoundaryKey) -> Option<Option<Geometry>> {
        self.lock().get(key).cloned()
    }

    fn insert(&self, key: BoundaryKey, geometry: Option<Geometry>) -> bool {
        let mut entries = self.lock();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, geometry);
        true
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::Polygon(vec![vec![
            vec![105.0, 21.0],
            vec![106.0, 21.0],
            vec![106.0, 22.0],
            vec![105.0, 21.0],
        ]])
    }

    #[test]
    fn first_write_wins() {
        let cache = InMemoryBoundaryCache::new();
        let key = BoundaryKey::new(1, 0, "Ha Long Bay");
        assert!(cache.insert(key.clone(), Some(square())));
        assert!(!cache.insert(key.clone(), None));
        assert_eq!(cache.get(&key), Some(Some(square())));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stored_none_is_distinct_from_missing() {
        let cache = InMemoryBoundaryCache::new();
        let key = BoundaryKey::new(2, 0, "Nowhere");
        assert_eq!(cache.get(&key), None);
        cache.insert(key.clone(), None);
        assert_eq!(cache.get(&key), Some(None));
    }

    #[test]
    fn same_name_on_different_days_does_not_collide() {
        let cache = InMemoryBoundaryCache::new();
        let day1 = BoundaryKey::new(1, 0, "Old Quarter");
        let day3 = BoundaryKey::new(3, 0, "Old Quarter");
        cache.insert(day1.clone(), Some(square()));
        cache.insert(day3.clone(), None);
        assert_eq!(cache.get(&day1), Some(Some(square())));
        assert_eq!(cache.get(&day3), Some(None));
        assert!(!cache.is_empty());
    }
}
