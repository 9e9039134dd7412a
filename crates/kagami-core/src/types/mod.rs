pub mod catalog;
pub mod enrichment;
pub mod episode;
pub mod local_file;
pub mod quality;
pub mod tokens;

pub use catalog::{CatalogEntry, MediaFormat, MediaId};
pub use enrichment::{EnrichmentBundle, EpisodeKind, EpisodeMetadata, EpisodeRecord};
pub use episode::EpisodeSpec;
pub use local_file::{FileStatus, LocalFile, MatchedEntry};
pub use quality::Resolution;
pub use tokens::{ParsedTokens, ReleaseFlags};
