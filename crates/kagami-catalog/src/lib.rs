//! # Kagami Catalog
//!
//! Catalog snapshot and fuzzy title matching. Maps the titles parsed from
//! local file names onto canonical catalog entries (AniList media ids),
//! choosing between seasons and formats with the parsed hints.
//!
//! ```rust
//! use kagami_catalog::{CatalogIndex, Matcher};
//! use kagami_core::types::{CatalogEntry, LocalFile};
//! use kagami_core::parser::FilenameParser;
//!
//! let index = CatalogIndex::new([CatalogEntry::new(1, "Show Name").with_episodes(12)]);
//! let parser = FilenameParser::new().unwrap();
//! let files = vec![
//!     LocalFile::new("/a/Show Name - 01.mkv", parser.parse("Show Name - 01.mkv")),
//!     LocalFile::new("/a/Random Video.mp4", parser.parse("Random Video.mp4")),
//! ];
//!
//! let outcome = Matcher::default().match_files(files, &index);
//! assert_eq!(outcome.matched.len(), 1);
//! assert_eq!(outcome.unmatched.len(), 1);
//! ```
pub mod index;
pub mod matcher;
pub mod similarity;

pub use index::{CatalogIndex, IndexedEntry, IndexedTitle};
pub use matcher::{MatchConfig, MatchOutcome, Matcher, DEFAULT_THRESHOLD};
pub use similarity::title_similarity;
