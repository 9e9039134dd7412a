//! In-memory clients for pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kagami_core::types::{CatalogEntry, EnrichmentBundle, EpisodeRecord, MediaId};
use parking_lot::Mutex;

use crate::client::{CatalogClient, EnrichmentClient};
use crate::error::ClientError;

#[derive(Debug, Default)]
pub struct MockCatalog {
    pub tracked: Vec<CatalogEntry>,
    pub related: HashMap<MediaId, CatalogEntry>,
    pub fail: bool,
    pub tracked_calls: AtomicUsize,
    pub entry_calls: AtomicUsize,
}

impl MockCatalog {
    pub fn new(tracked: Vec<CatalogEntry>) -> Self {
        Self {
            tracked,
            ..Self::default()
        }
    }

    pub fn with_related(mut self, entry: CatalogEntry) -> Self {
        self.related.insert(entry.id, entry);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn fetch_tracked_catalog(&self) -> Result<Vec<CatalogEntry>, ClientError> {
        self.tracked_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Api("catalog unavailable".into()));
        }
        Ok(self.tracked.clone())
    }

    async fn fetch_catalog_entry(&self, id: MediaId) -> Result<CatalogEntry, ClientError> {
        self.entry_calls.fetch_add(1, Ordering::SeqCst);
        self.related.get(&id).cloned().ok_or(ClientError::NotFound(id))
    }
}

#[derive(Debug, Default)]
pub struct MockEnrichment {
    pub bundles: HashMap<MediaId, EnrichmentBundle>,
    pub delay: Duration,
    pub calls: Mutex<HashMap<MediaId, usize>>,
}

impl MockEnrichment {
    /// A bundle with `episodes` titled records ("Episode N").
    pub fn with_bundle(mut self, id: u64, episodes: u32) -> Self {
        let mut bundle = EnrichmentBundle::new(MediaId(id));
        bundle.episode_count = Some(episodes);
        for n in 1..=episodes {
            bundle.episodes.insert(
                n,
                EpisodeRecord {
                    episode: n,
                    title: Some(format!("Episode {n}")),
                    ..EpisodeRecord::default()
                },
            );
        }
        self.bundles.insert(MediaId(id), bundle);
        self
    }

    pub fn with_special(mut self, id: u64, number: u32, title: &str) -> Self {
        let bundle = self
            .bundles
            .entry(MediaId(id))
            .or_insert_with(|| EnrichmentBundle::new(MediaId(id)));
        bundle.specials.insert(
            number,
            EpisodeRecord {
                episode: number,
                title: Some(title.into()),
                ..EpisodeRecord::default()
            },
        );
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self, id: u64) -> usize {
        self.calls.lock().get(&MediaId(id)).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl EnrichmentClient for MockEnrichment {
    async fn fetch_enrichment(&self, id: MediaId) -> Result<EnrichmentBundle, ClientError> {
        *self.calls.lock().entry(id).or_default() += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.bundles.get(&id).cloned().ok_or(ClientError::NotFound(id))
    }
}
