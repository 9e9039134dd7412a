//! Process-wide caches shared by consecutive scans.

pub mod catalog;
pub mod enrichment;

pub use catalog::CatalogCache;
pub use enrichment::{EnrichmentCache, Lookup};
