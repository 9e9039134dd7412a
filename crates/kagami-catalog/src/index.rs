//! Immutable, queryable snapshot of the catalog used by one scan.

use std::collections::HashMap;
use std::sync::Arc;

use kagami_core::normalize::{normalize, split_season_hint};
use kagami_core::types::{CatalogEntry, MediaId};
use tracing::debug;

/// One normalized title of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedTitle {
    /// Normalized title with any trailing season marker removed.
    pub base: String,
    /// Season encoded by the removed marker.
    pub season_hint: Option<u32>,
}

impl IndexedTitle {
    fn new(raw: &str) -> Self {
        let (base, season_hint) = split_season_hint(&normalize(raw));
        Self { base, season_hint }
    }
}

/// A catalog entry together with its precomputed match keys.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    entry: Arc<CatalogEntry>,
    titles: Vec<IndexedTitle>,
    season: u32,
}

impl IndexedEntry {
    fn new(entry: Arc<CatalogEntry>) -> Self {
        let titles: Vec<IndexedTitle> = entry
            .titles()
            .map(IndexedTitle::new)
            .filter(|t| !t.base.is_empty())
            .collect();
        let season = entry
            .season
            .or_else(|| titles.iter().find_map(|t| t.season_hint))
            .unwrap_or(1);
        Self {
            entry,
            titles,
            season,
        }
    }

    #[must_use]
    pub fn id(&self) -> MediaId {
        self.entry.id
    }

    #[must_use]
    pub fn entry(&self) -> &CatalogEntry {
        &self.entry
    }

    /// Shared handle to the underlying entry.
    #[must_use]
    pub fn shared(&self) -> Arc<CatalogEntry> {
        Arc::clone(&self.entry)
    }

    /// Normalized primary title and synonyms; empty titles are skipped.
    #[must_use]
    pub fn titles(&self) -> &[IndexedTitle] {
        &self.titles
    }

    /// Explicit season, else the first title's season marker, else 1.
    #[must_use]
    pub fn season(&self) -> u32 {
        self.season
    }
}

/// Read-only catalog snapshot, ordered by media id.
///
/// Built once before matching; shared across matcher workers behind an
/// `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<IndexedEntry>,
    positions: HashMap<MediaId, usize>,
}

impl CatalogIndex {
    /// Builds the index. When an id appears more than once the first entry
    /// is kept.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self::from_shared(entries.into_iter().map(Arc::new))
    }

    /// Builds the index from entries already shared with a cache.
    pub fn from_shared(entries: impl IntoIterator<Item = Arc<CatalogEntry>>) -> Self {
        let mut sorted: Vec<Arc<CatalogEntry>> = entries.into_iter().collect();
        // Stable sort keeps the first of any duplicate ids in front.
        sorted.sort_by_key(|e| e.id);

        let mut index = Self::default();
        for entry in sorted {
            if index.positions.contains_key(&entry.id) {
                debug!(id = %entry.id, "duplicate catalog entry ignored");
                continue;
            }
            index.positions.insert(entry.id, index.entries.len());
            index.entries.push(IndexedEntry::new(entry));
        }
        index
    }

    #[must_use]
    pub fn get(&self, id: MediaId) -> Option<&IndexedEntry> {
        self.positions.get(&id).map(|&pos| &self.entries[pos])
    }

    #[must_use]
    pub fn contains(&self, id: MediaId) -> bool {
        self.positions.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedEntry> {
        self.entries.iter()
    }
}

impl FromIterator<CatalogEntry> for CatalogIndex {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self::new(iter)
    }
}
