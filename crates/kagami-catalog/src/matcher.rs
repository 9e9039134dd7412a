//! # Matcher
//!
//! Finds the catalog entry a local file belongs to. Every entry title is
//! scored against the file's normalized title; candidates above the
//! acceptance threshold are ranked by how well the entry agrees with the
//! parsed season, episode, release flags and year.

use std::cmp::Ordering;

use kagami_core::normalize::{normalize, split_season_hint};
use kagami_core::types::{
    EpisodeKind, LocalFile, MatchedEntry, MediaFormat, MediaId, ParsedTokens,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::index::{CatalogIndex, IndexedEntry};
use crate::similarity::title_similarity;

/// Default minimum similarity for a candidate to be accepted.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Configuration for the matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum title similarity (inclusive) for a candidate.
    pub threshold: f64,
    /// Rebase absolute episode numbers onto sequels.
    pub resolve_offsets: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            resolve_offsets: true,
        }
    }
}

impl MatchConfig {
    /// Create a new matcher configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance threshold, clamped to `[0.0, 1.0]`.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    /// Enable or disable sequel offset resolution.
    pub fn with_offset_resolution(mut self, enabled: bool) -> Self {
        self.resolve_offsets = enabled;
        self
    }
}

/// Files split by match verdict, each list in input order.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub matched: Vec<LocalFile>,
    pub unmatched: Vec<LocalFile>,
}

/// A scored entry above the threshold.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    entry: &'a IndexedEntry,
    score: f64,
    consistency: u8,
}

impl Candidate<'_> {
    /// Higher consistency, then higher score, then lower id.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .consistency
            .cmp(&self.consistency)
            .then_with(|| other.score.total_cmp(&self.score))
            .then_with(|| self.entry.id().cmp(&other.entry.id()))
    }
}

/// Normalized view of the parsed tokens used for scoring.
struct Query<'a> {
    tokens: &'a ParsedTokens,
    base: String,
    season: u32,
}

impl<'a> Query<'a> {
    /// `None` when the file has no usable title.
    fn new(tokens: &'a ParsedTokens) -> Option<Self> {
        if !tokens.has_title() {
            return None;
        }
        let (base, hint) = split_season_hint(&normalize(&tokens.title));
        if base.is_empty() {
            return None;
        }
        // A season marker left in the title only counts when the name
        // carried no season of its own.
        let season = match hint {
            Some(hint) if tokens.season == 1 => hint,
            _ => tokens.season,
        };
        Some(Self { tokens, base, season })
    }

    fn consistency(&self, entry: &IndexedEntry) -> u8 {
        let catalog = entry.entry();
        let flags = self.tokens.flags;
        let mut points = 0;

        if entry.season() == self.season {
            points += 2;
        }

        let episode_fits = match (self.tokens.episode, catalog.episode_count) {
            (Some(ep), Some(count)) => ep.last() <= count,
            _ => true,
        };
        if episode_fits {
            points += 1;
        }

        let format_agrees = if flags.movie {
            catalog.format == MediaFormat::Movie
        } else if flags.special {
            catalog.format.is_special()
        } else {
            catalog.format.is_episodic() || catalog.format == MediaFormat::Unknown
        };
        if format_agrees {
            points += 1;
        }

        if self.tokens.year.is_some() && self.tokens.year == catalog.year {
            points += 1;
        }

        points
    }
}

/// Title matcher over a [`CatalogIndex`].
///
/// Read-only on the index; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Computes the verdict for a set of parsed tokens without touching any
    /// file.
    ///
    /// # Examples
    /// ```
    /// use kagami_catalog::{CatalogIndex, Matcher};
    /// use kagami_core::parser::FilenameParser;
    /// use kagami_core::types::{CatalogEntry, MediaId};
    ///
    /// let index = CatalogIndex::new([CatalogEntry::new(1, "Show Name").with_episodes(12)]);
    /// let parser = FilenameParser::new().unwrap();
    /// let tokens = parser.parse("Show Name S02E05 [1080p][GroupX].mkv");
    ///
    /// let verdict = Matcher::default().best_match(&tokens, &index).unwrap();
    /// assert_eq!(verdict.media_id, MediaId(1));
    /// assert_eq!(verdict.episode, Some(5));
    /// ```
    pub fn best_match(&self, tokens: &ParsedTokens, index: &CatalogIndex) -> Option<MatchedEntry> {
        let query = Query::new(tokens)?;

        let best = index
            .iter()
            .filter_map(|entry| {
                let score = entry
                    .titles()
                    .iter()
                    .map(|t| title_similarity(&query.base, &t.base))
                    .fold(0.0_f64, f64::max);
                (score >= self.config.threshold).then(|| Candidate {
                    entry,
                    score,
                    consistency: query.consistency(entry),
                })
            })
            .min_by(Candidate::rank)?;

        // A special matched to its own OVA/special entry is numbered like
        // any regular episode of that entry.
        let kind = if tokens.flags.special && !best.entry.entry().format.is_special() {
            EpisodeKind::Special
        } else {
            EpisodeKind::Main
        };

        let episode = tokens.episode_number();
        let (media_id, episode) = if self.config.resolve_offsets {
            resolve_offset(index, best.entry.id(), episode)
        } else {
            (best.entry.id(), episode)
        };

        Some(MatchedEntry {
            media_id,
            confidence: best.score,
            episode,
            kind,
        })
    }

    /// Matches one file. A file that already carries a verdict keeps it.
    pub fn match_file(&self, file: &mut LocalFile, index: &CatalogIndex) -> Option<MatchedEntry> {
        if let Some(existing) = file.matched() {
            return Some(*existing);
        }

        let verdict = self.best_match(file.parsed(), index);
        match verdict {
            Some(entry) => {
                debug!(
                    file = file.name(),
                    media_id = %entry.media_id,
                    confidence = entry.confidence,
                    "matched"
                );
                Some(*file.assign_match(entry))
            }
            None => {
                debug!(file = file.name(), title = %file.parsed().title, "no match");
                None
            }
        }
    }

    /// Matches files in place on the rayon pool. Returns how many files
    /// carry a verdict afterwards.
    pub fn match_all(&self, files: &mut [LocalFile], index: &CatalogIndex) -> usize {
        let matched: usize = files
            .par_iter_mut()
            .map(|file| usize::from(self.match_file(file, index).is_some()))
            .sum();
        info!(files = files.len(), matched, catalog = index.len(), "matching finished");
        matched
    }

    /// Matches files and splits them by verdict.
    pub fn match_files(&self, mut files: Vec<LocalFile>, index: &CatalogIndex) -> MatchOutcome {
        self.match_all(&mut files, index);
        let (matched, unmatched) = files.into_iter().partition(|f| f.matched().is_some());
        MatchOutcome { matched, unmatched }
    }
}

/// Walks the sequel chain while the episode exceeds the entry's count.
/// A broken chain keeps the original entry and episode.
fn resolve_offset(
    index: &CatalogIndex,
    id: MediaId,
    episode: Option<u32>,
) -> (MediaId, Option<u32>) {
    let Some(original) = episode else {
        return (id, None);
    };

    let (mut current, mut ep) = (id, original);
    for _ in 0..index.len() {
        let Some(entry) = index.get(current) else {
            break;
        };
        let catalog = entry.entry();
        let Some(count) = catalog.episode_count.filter(|&c| c > 0) else {
            return (current, Some(ep));
        };
        if ep <= count {
            return (current, Some(ep));
        }
        match catalog.sequel.filter(|&s| index.contains(s)) {
            Some(sequel) => {
                ep -= count;
                current = sequel;
            }
            None => break,
        }
    }

    (id, Some(original))
}
