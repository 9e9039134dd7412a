//! # Kagami Scan
//!
//! The asynchronous half of a Kagami scan: loading the user's catalog from
//! AniList, rate limiting calls to external services, caching catalog
//! entries and ani.zip enrichment bundles, and hydrating matched files
//! with episode metadata.
//!
//! [`Scanner`] ties the pieces together:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kagami_scan::{AniListClient, AniZipClient, ScanConfig, Scanner};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = Scanner::new(
//!     Arc::new(AniListClient::new("someone")?),
//!     Arc::new(AniZipClient::new()?),
//!     ScanConfig::default(),
//! )?;
//! let outcome = scanner.scan(["/anime/[SubsPlease] Show Name - 05 (1080p).mkv"]).await?;
//! println!("{}", outcome.files.len());
//! # Ok(())
//! # }
//! ```
pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod hydrator;
pub mod limiter;
pub mod providers;
pub mod scanner;

#[cfg(test)]
mod testing;

pub use cache::{CatalogCache, EnrichmentCache, Lookup};
pub use catalog::CatalogLoader;
pub use client::{CatalogClient, EnrichmentClient};
pub use config::{RateLimitConfig, ScanConfig};
pub use error::{ClientError, Result, ScanError};
pub use hydrator::{HydrationReport, Hydrator};
pub use limiter::{RatePermit, RateLimiter};
pub use providers::{AniListClient, AniZipClient};
pub use scanner::{ScanOutcome, Scanner};
