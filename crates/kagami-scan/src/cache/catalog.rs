use std::collections::HashMap;
use std::sync::Arc;

use kagami_core::types::{CatalogEntry, MediaId};
use parking_lot::RwLock;

/// Catalog entries keyed by media id.
///
/// Entries are only replaced by fresher fetches and dropped by
/// [`clear`](Self::clear) between scans.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entries: RwLock<HashMap<MediaId, Arc<CatalogEntry>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: MediaId) -> Option<Arc<CatalogEntry>> {
        self.entries.read().get(&id).cloned()
    }

    pub fn contains(&self, id: MediaId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Stores an entry, replacing any previous one with the same id.
    pub fn put(&self, entry: CatalogEntry) -> Arc<CatalogEntry> {
        let entry = Arc::new(entry);
        self.entries.write().insert(entry.id, Arc::clone(&entry));
        entry
    }

    /// Stores a batch under a single lock.
    pub fn extend(&self, entries: impl IntoIterator<Item = CatalogEntry>) -> Vec<Arc<CatalogEntry>> {
        let mut map = self.entries.write();
        entries
            .into_iter()
            .map(|entry| {
                let entry = Arc::new(entry);
                map.insert(entry.id, Arc::clone(&entry));
                entry
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
