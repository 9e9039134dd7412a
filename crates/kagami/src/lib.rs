//! # Kagami
//!
//! Reconciles a local anime library against a user's AniList catalog and
//! enriches matched files with per-episode metadata from ani.zip.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`kagami_core`]: filename parser, title normalizer and the shared data model
//! - [`kagami_catalog`]: catalog index, title similarity and the matcher
//! - [`kagami_scan`]: rate limiting, caches, service clients and the scan pipeline
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kagami::{AniListClient, AniZipClient, FileStatus, ScanConfig, Scanner};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = Scanner::new(
//!     Arc::new(AniListClient::new("someone")?),
//!     Arc::new(AniZipClient::new()?),
//!     ScanConfig::default(),
//! )?;
//! let outcome = scanner.scan(["/anime/Show Name S02E05 [1080p][GroupX].mkv"]).await?;
//! for file in outcome.with_status(FileStatus::Hydrated) {
//!     println!("{} -> {:?}", file.name(), file.metadata());
//! }
//! # Ok(())
//! # }
//! ```

pub use kagami_catalog;
pub use kagami_core;
pub use kagami_scan;

pub use kagami_catalog::{CatalogIndex, MatchConfig, Matcher, title_similarity};
pub use kagami_core::{
    CatalogEntry, FileStatus, FilenameParser, KagamiError, LocalFile, MatchedEntry, MediaId,
    ParsedTokens, normalize,
};
pub use kagami_scan::{
    AniListClient, AniZipClient, CatalogClient, EnrichmentClient, RateLimitConfig, ScanConfig,
    ScanError, ScanOutcome, Scanner,
};
