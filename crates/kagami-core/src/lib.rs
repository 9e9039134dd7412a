//! # Kagami Core
//!
//! Shared data model of the Kagami scanner: the filename parser, the title
//! normalizer, and the types that flow between parsing, matching and
//! hydration.
//!
//! ## Quick Start
//!
//! ```rust
//! use kagami_core::normalize::normalize;
//! use kagami_core::parser::FilenameParser;
//!
//! let parser = FilenameParser::new().unwrap();
//! let tokens = parser.parse("[SubsPlease] Jujutsu Kaisen - 24 (1080p) [A1B2C3D4].mkv");
//!
//! assert_eq!(tokens.title, "Jujutsu Kaisen");
//! assert_eq!(tokens.episode_number(), Some(24));
//! assert_eq!(normalize(&tokens.title), "jujutsu kaisen");
//! ```
pub mod error;
pub mod normalize;
pub mod parser;
pub mod types;

// Re-export primary API
pub use error::{KagamiError, Result};
pub use normalize::{normalize, split_season_hint};
pub use parser::FilenameParser;
pub use types::{
    CatalogEntry, EnrichmentBundle, EpisodeKind, EpisodeMetadata, EpisodeRecord, EpisodeSpec,
    FileStatus, LocalFile, MatchedEntry, MediaFormat, MediaId, ParsedTokens, ReleaseFlags,
    Resolution,
};
