//! Session cache for the most recent catalog snapshot.
//!
//! Whole-value swap only: readers see either the previous complete
//! snapshot or the next one, never a partial update. Not internally
//! synchronized; callers sharing a client serialize access.

use crate::models::CatalogSnapshot;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct CatalogCache {
    snapshot: Option<Arc<CatalogSnapshot>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached snapshot, if any
    pub fn get(&self) -> Option<Arc<CatalogSnapshot>> {
        self.snapshot.clone()
    }

    /// Replace the cached snapshot, returning the shared handle
    pub fn store(&mut self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let shared = Arc::new(snapshot);
        self.snapshot = Some(shared.clone());
        shared
    }

    /// Drop the cached snapshot
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub fn is_populated(&self) -> bool {
        self.snapshot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, LayerGeometry};

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![CatalogEntry {
            id: "boundaries".to_string(),
            name: "Admin Boundaries".to_string(),
            category: "Admin".to_string(),
            geometry_type: LayerGeometry::Polygon,
        }])
    }

    #[test]
    fn test_get_returns_identical_handle() {
        let mut cache = CatalogCache::new();
        let stored = cache.store(snapshot());
        let fetched = cache.get().unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
    }

    #[test]
    fn test_invalidate_clears() {
        let mut cache = CatalogCache::new();
        cache.store(snapshot());
        assert!(cache.is_populated());
        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_store_replaces_whole_value() {
        let mut cache = CatalogCache::new();
        let first = cache.store(snapshot());
        let second = cache.store(snapshot());
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &cache.get().unwrap()));
    }
}
