//! Attaches per-episode metadata to matched files.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use kagami_core::types::{EnrichmentBundle, EpisodeMetadata, LocalFile, MatchedEntry, MediaId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::EnrichmentCache;
use crate::client::EnrichmentClient;
use crate::error::ClientError;
use crate::limiter::RateLimiter;

/// Per-id outcome counts of one hydration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HydrationReport {
    /// Ids fetched from the enrichment service by this pass.
    pub fetched: usize,
    /// Ids served from the cache (or from a fetch already in flight).
    pub cached: usize,
    /// Ids whose fetch failed, timed out, or was negative-cached.
    pub failed: usize,
    /// Files that received metadata.
    pub hydrated_files: usize,
}

/// Resolves enrichment bundles for matched files, one fetch per media id.
#[derive(Clone)]
pub struct Hydrator {
    client: Arc<dyn EnrichmentClient>,
    limiter: Arc<RateLimiter>,
    cache: Arc<EnrichmentCache>,
    fetch_timeout: Duration,
    concurrency: usize,
}

impl Hydrator {
    pub fn new(
        client: Arc<dyn EnrichmentClient>,
        limiter: Arc<RateLimiter>,
        cache: Arc<EnrichmentCache>,
    ) -> Self {
        Self {
            client,
            limiter,
            cache,
            fetch_timeout: Duration::from_secs(30),
            concurrency: 4,
        }
    }

    /// Deadline for the service call, counted from the limiter grant.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Hydrates every matched, not yet hydrated file.
    ///
    /// Failures stay local to their media id: the files of that id keep no
    /// metadata and the rest of the batch proceeds.
    pub async fn hydrate(&self, files: &mut [LocalFile]) -> HydrationReport {
        let ids: BTreeSet<MediaId> = files
            .iter()
            .filter(|f| f.metadata().is_none())
            .filter_map(|f| f.matched().map(|m| m.media_id))
            .collect();

        let mut report = HydrationReport::default();
        let mut bundles: HashMap<MediaId, Arc<EnrichmentBundle>> = HashMap::new();

        let mut resolved = stream::iter(ids)
            .map(|id| async move { (id, self.resolve(id).await) })
            .buffer_unordered(self.concurrency);

        while let Some((id, result)) = resolved.next().await {
            match result {
                Ok((bundle, fetched)) => {
                    if fetched {
                        report.fetched += 1;
                    } else {
                        report.cached += 1;
                    }
                    bundles.insert(id, bundle);
                }
                Err(error) => {
                    warn!(%id, %error, "enrichment unavailable");
                    report.failed += 1;
                }
            }
        }

        for file in files.iter_mut() {
            let Some(matched) = file.matched().copied() else {
                continue;
            };
            let Some(bundle) = bundles.get(&matched.media_id) else {
                continue;
            };
            let Some(metadata) = project(file, &matched, bundle) else {
                debug!(file = file.name(), media_id = %matched.media_id, "no episode record");
                continue;
            };
            if file.attach_metadata(metadata) {
                report.hydrated_files += 1;
            }
        }

        info!(
            fetched = report.fetched,
            cached = report.cached,
            failed = report.failed,
            hydrated = report.hydrated_files,
            "hydration finished"
        );
        report
    }

    async fn resolve(&self, id: MediaId) -> Result<(Arc<EnrichmentBundle>, bool), Arc<ClientError>> {
        let lookup = self
            .cache
            .get_or_fetch(id, || async {
                let _permit = self.limiter.acquire().await;
                match tokio::time::timeout(self.fetch_timeout, self.client.fetch_enrichment(id))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(ClientError::Timeout(self.fetch_timeout)),
                }
            })
            .await?;
        Ok((lookup.bundle, lookup.fetched))
    }
}

/// Picks the bundle record for a file's resolved episode.
///
/// Creditless files carry no episode of their own. A file without an
/// episode number maps to episode 1 when it is a movie or the work has a
/// single episode.
fn project(
    file: &LocalFile,
    matched: &MatchedEntry,
    bundle: &EnrichmentBundle,
) -> Option<EpisodeMetadata> {
    let parsed = file.parsed();
    if parsed.flags.creditless {
        return None;
    }

    let kind = matched.kind;
    let single = parsed.flags.movie || bundle.episode_count == Some(1);
    let episode = matched.episode.or(single.then_some(1))?;

    bundle
        .lookup(kind, episode)
        .map(|record| EpisodeMetadata::project(matched.media_id, kind, record))
}
