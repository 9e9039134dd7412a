//! Per-media enrichment bundles with single-flight fetching and a
//! negative cache for failures.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kagami_core::types::{EnrichmentBundle, MediaId};
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

use crate::error::ClientError;

#[derive(Debug, Clone)]
struct CachedFailure {
    error: Arc<ClientError>,
    at: Instant,
}

type SlotValue = Result<Arc<EnrichmentBundle>, CachedFailure>;
type Slot = Arc<OnceCell<SlotValue>>;

/// A bundle resolved through [`EnrichmentCache::get_or_fetch`].
#[derive(Debug, Clone)]
pub struct Lookup {
    pub bundle: Arc<EnrichmentBundle>,
    /// `true` when this call performed the fetch.
    pub fetched: bool,
}

/// Enrichment bundles keyed by media id.
///
/// Concurrent misses for one id share a single fetch: the slot map lock is
/// only held to find or create the id's [`OnceCell`], and the fetch runs
/// inside the cell. Successes never expire; failures are served for
/// `negative_ttl` and then retried.
#[derive(Debug)]
pub struct EnrichmentCache {
    slots: Mutex<HashMap<MediaId, Slot>>,
    negative_ttl: Duration,
}

impl Default for EnrichmentCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl EnrichmentCache {
    pub fn new(negative_ttl: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            negative_ttl,
        }
    }

    /// Returns a cached bundle. Pending fetches and failures yield `None`.
    pub fn get(&self, id: MediaId) -> Option<Arc<EnrichmentBundle>> {
        let slot = self.slots.lock().get(&id).cloned()?;
        match slot.get() {
            Some(Ok(bundle)) => Some(Arc::clone(bundle)),
            _ => None,
        }
    }

    /// Stores a bundle under its media id, replacing whatever was there.
    pub fn put(&self, bundle: EnrichmentBundle) -> Arc<EnrichmentBundle> {
        let bundle = Arc::new(bundle);
        let slot = Arc::new(OnceCell::new_with(Some(Ok(Arc::clone(&bundle)))));
        self.slots.lock().insert(bundle.media_id, slot);
        bundle
    }

    /// Returns the cached bundle for `id`, or runs `fetch` to obtain it.
    ///
    /// Callers arriving while a fetch is in flight wait for its result. A
    /// cached failure younger than the grace period is returned without
    /// fetching.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        id: MediaId,
        fetch: F,
    ) -> Result<Lookup, Arc<ClientError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<EnrichmentBundle, ClientError>>,
    {
        let slot = self.slot(id);

        let mut fetched = false;
        let value = slot
            .get_or_init(|| {
                fetched = true;
                async move {
                    fetch().await.map(Arc::new).map_err(|error| CachedFailure {
                        error: Arc::new(error),
                        at: Instant::now(),
                    })
                }
            })
            .await;

        match value {
            Ok(bundle) => Ok(Lookup {
                bundle: Arc::clone(bundle),
                fetched,
            }),
            Err(failure) => Err(Arc::clone(&failure.error)),
        }
    }

    /// Finds or creates the slot for `id`, discarding an expired failure.
    fn slot(&self, id: MediaId) -> Slot {
        let mut slots = self.slots.lock();
        let slot = slots.entry(id).or_default();
        if let Some(Err(failure)) = slot.get() {
            if failure.at.elapsed() >= self.negative_ttl {
                debug!(%id, "negative cache entry expired");
                *slot = Slot::default();
            }
        }
        Arc::clone(slot)
    }

    /// Number of cached bundles.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot.get(), Some(Ok(_))))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bundle(id: u64) -> EnrichmentBundle {
        EnrichmentBundle::new(MediaId(id))
    }

    #[tokio::test]
    async fn put_then_get() {
        let cache = EnrichmentCache::default();
        assert!(cache.get(MediaId(1)).is_none());

        cache.put(bundle(1));
        assert_eq!(cache.get(MediaId(1)).unwrap().media_id, MediaId(1));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let cache = EnrichmentCache::default();
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(bundle(3))
        };

        let first = cache.get_or_fetch(MediaId(3), fetch).await.unwrap();
        let second = cache.get_or_fetch(MediaId(3), fetch).await.unwrap();

        assert!(first.fetched);
        assert!(!second.fetched);
        assert!(Arc::ptr_eq(&first.bundle, &second.bundle));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_fetch() {
        let cache = Arc::new(EnrichmentCache::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_fetch(MediaId(5), || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok(bundle(5))
                        })
                        .await
                })
            })
            .collect();

        let mut fetched = 0;
        for task in tasks {
            let lookup = task.await.unwrap().unwrap();
            fetched += usize::from(lookup.fetched);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetched, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_cached_until_grace_period_ends() {
        let cache = EnrichmentCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let failing = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Api("boom".into()))
        };

        assert!(cache.get_or_fetch(MediaId(9), failing).await.is_err());
        let err = cache.get_or_fetch(MediaId(9), failing).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.get(MediaId(9)).is_none());

        tokio::time::advance(Duration::from_secs(61)).await;
        let lookup = cache
            .get_or_fetch(MediaId(9), || async { Ok(bundle(9)) })
            .await
            .unwrap();
        assert!(lookup.fetched);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.get(MediaId(9)).is_some());
    }
}
