//! # Scan pipeline
//!
//! Catalog load, filename parsing, matching and hydration for one batch of
//! paths. Caches outlive a scan and are cleared explicitly.

use std::path::Path;
use std::sync::Arc;

use kagami_catalog::Matcher;
use kagami_core::parser::FilenameParser;
use kagami_core::types::{FileStatus, LocalFile};
use serde::Serialize;
use tracing::info;

use crate::cache::{CatalogCache, EnrichmentCache};
use crate::catalog::CatalogLoader;
use crate::client::{CatalogClient, EnrichmentClient};
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::hydrator::{HydrationReport, Hydrator};
use crate::limiter::RateLimiter;

/// Everything one scan produced, files in input order.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub files: Vec<LocalFile>,
    /// Entries in the catalog index the files were matched against.
    pub catalog_size: usize,
    pub hydration: HydrationReport,
}

impl ScanOutcome {
    /// Number of files in the given state.
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status() == status).count()
    }

    pub fn with_status(&self, status: FileStatus) -> impl Iterator<Item = &LocalFile> {
        self.files.iter().filter(move |f| f.status() == status)
    }
}

/// Runs scans against one catalog and one enrichment service.
pub struct Scanner {
    config: ScanConfig,
    parser: FilenameParser,
    catalog_client: Arc<dyn CatalogClient>,
    catalog_limiter: RateLimiter,
    catalog_cache: CatalogCache,
    enrichment_cache: Arc<EnrichmentCache>,
    hydrator: Hydrator,
}

impl Scanner {
    /// Creates a scanner.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Parser` if the filename parser cannot be built.
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        enrichment: Arc<dyn EnrichmentClient>,
        config: ScanConfig,
    ) -> Result<Self> {
        let enrichment_cache = Arc::new(EnrichmentCache::new(config.negative_ttl));
        let hydrator = Hydrator::new(
            enrichment,
            Arc::new(RateLimiter::new(config.enrichment_limit)),
            Arc::clone(&enrichment_cache),
        )
        .with_fetch_timeout(config.fetch_timeout)
        .with_concurrency(config.hydration_concurrency);

        Ok(Self {
            parser: FilenameParser::new()?,
            catalog_client: catalog,
            catalog_limiter: RateLimiter::new(config.catalog_limit),
            catalog_cache: CatalogCache::new(),
            enrichment_cache,
            hydrator,
            config,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn catalog_cache(&self) -> &CatalogCache {
        &self.catalog_cache
    }

    pub fn enrichment_cache(&self) -> &EnrichmentCache {
        &self.enrichment_cache
    }

    /// Drops cached catalog entries and enrichment bundles.
    pub fn clear_caches(&self) {
        self.catalog_cache.clear();
        self.enrichment_cache.clear();
    }

    /// Scans a batch of paths.
    ///
    /// # Errors
    ///
    /// Fails with `ScanError::Catalog` when the catalog cannot be loaded;
    /// no file is matched in that case. Enrichment failures are not errors:
    /// they leave the affected files unhydrated.
    pub async fn scan<P: AsRef<Path>>(
        &self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<ScanOutcome> {
        let index = CatalogLoader::new(
            self.catalog_client.as_ref(),
            &self.catalog_limiter,
            &self.catalog_cache,
        )
        .with_relation_depth(self.config.relation_depth)
        .load()
        .await
        .map_err(ScanError::Catalog)?;
        let index = Arc::new(index);

        let mut files: Vec<LocalFile> = paths
            .into_iter()
            .map(|p| {
                let path = p.as_ref();
                LocalFile::new(path, self.parser.parse_path(path))
            })
            .collect();

        let matcher = Matcher::new(self.config.matching.clone());
        let matcher_index = Arc::clone(&index);
        let mut files = tokio::task::spawn_blocking(move || {
            matcher.match_all(&mut files, &matcher_index);
            files
        })
        .await?;

        let hydration = self.hydrator.hydrate(&mut files).await;

        let outcome = ScanOutcome {
            files,
            catalog_size: index.len(),
            hydration,
        };
        info!(
            files = outcome.files.len(),
            unmatched = outcome.count(FileStatus::Unmatched),
            matched = outcome.count(FileStatus::Matched),
            hydrated = outcome.count(FileStatus::Hydrated),
            "scan finished"
        );
        Ok(outcome)
    }
}
