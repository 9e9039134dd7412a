//! Builds the per-scan [`CatalogIndex`] from the catalog service.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use kagami_catalog::CatalogIndex;
use kagami_core::types::{CatalogEntry, MediaId};
use tracing::{debug, info};

use crate::cache::CatalogCache;
use crate::client::CatalogClient;
use crate::error::ClientError;
use crate::limiter::RateLimiter;

/// Loads the tracked catalog plus related entries, refreshing the cache.
pub struct CatalogLoader<'a> {
    client: &'a dyn CatalogClient,
    limiter: &'a RateLimiter,
    cache: &'a CatalogCache,
    relation_depth: usize,
}

impl<'a> CatalogLoader<'a> {
    pub fn new(
        client: &'a dyn CatalogClient,
        limiter: &'a RateLimiter,
        cache: &'a CatalogCache,
    ) -> Self {
        Self {
            client,
            limiter,
            cache,
            relation_depth: 2,
        }
    }

    /// How many sequel/prequel hops to follow from tracked entries.
    pub fn with_relation_depth(mut self, depth: usize) -> Self {
        self.relation_depth = depth;
        self
    }

    /// Fetches the tracked catalog, then resolves related ids breadth-first
    /// from the cache or, on a miss, from the service.
    ///
    /// Every service call goes through the limiter. The first failure
    /// aborts the load.
    pub async fn load(&self) -> Result<CatalogIndex, ClientError> {
        let tracked = {
            let _permit = self.limiter.acquire().await;
            self.client.fetch_tracked_catalog().await?
        };
        let tracked_count = tracked.len();

        let mut entries: HashMap<MediaId, Arc<CatalogEntry>> = self
            .cache
            .extend(tracked)
            .into_iter()
            .map(|entry| (entry.id, entry))
            .collect();

        let (mut from_cache, mut fetched) = (0usize, 0usize);
        let mut frontier: BTreeSet<MediaId> =
            entries.values().flat_map(|e| e.relations()).collect();

        for depth in 1..=self.relation_depth {
            let mut next = BTreeSet::new();
            for id in frontier {
                if entries.contains_key(&id) {
                    continue;
                }

                let entry = match self.cache.get(id) {
                    Some(entry) => {
                        from_cache += 1;
                        entry
                    }
                    None => {
                        let _permit = self.limiter.acquire().await;
                        let entry = self.client.fetch_catalog_entry(id).await?;
                        fetched += 1;
                        self.cache.put(entry)
                    }
                };
                debug!(%id, depth, title = %entry.title, "resolved related entry");

                next.extend(entry.relations());
                entries.insert(id, entry);
            }
            frontier = next;
        }

        info!(
            tracked = tracked_count,
            related_cached = from_cache,
            related_fetched = fetched,
            total = entries.len(),
            "catalog loaded"
        );
        Ok(CatalogIndex::from_shared(entries.into_values()))
    }
}
