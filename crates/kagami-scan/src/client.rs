//! Seams to the external catalog and enrichment services.

use std::sync::Arc;

use async_trait::async_trait;
use kagami_core::types::{CatalogEntry, EnrichmentBundle, MediaId};

use crate::error::ClientError;

/// Source of catalog entries (AniList).
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Every entry the user tracks.
    async fn fetch_tracked_catalog(&self) -> Result<Vec<CatalogEntry>, ClientError>;

    /// One entry by id.
    async fn fetch_catalog_entry(&self, id: MediaId) -> Result<CatalogEntry, ClientError>;
}

/// Source of per-episode metadata (ani.zip).
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    async fn fetch_enrichment(&self, id: MediaId) -> Result<EnrichmentBundle, ClientError>;
}

#[async_trait]
impl<T: CatalogClient + ?Sized> CatalogClient for Arc<T> {
    async fn fetch_tracked_catalog(&self) -> Result<Vec<CatalogEntry>, ClientError> {
        (**self).fetch_tracked_catalog().await
    }

    async fn fetch_catalog_entry(&self, id: MediaId) -> Result<CatalogEntry, ClientError> {
        (**self).fetch_catalog_entry(id).await
    }
}

#[async_trait]
impl<T: EnrichmentClient + ?Sized> EnrichmentClient for Arc<T> {
    async fn fetch_enrichment(&self, id: MediaId) -> Result<EnrichmentBundle, ClientError> {
        (**self).fetch_enrichment(id).await
    }
}
