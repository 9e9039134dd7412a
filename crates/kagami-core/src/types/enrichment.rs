use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::MediaId;

/// Metadata for one episode as delivered by the enrichment service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: u32,
    pub title: Option<String>,
    /// Air date as published (`YYYY-MM-DD`).
    pub air_date: Option<String>,
    /// Thumbnail URL.
    pub image: Option<String>,
    pub overview: Option<String>,
    pub length_minutes: Option<u32>,
    /// Episode number counted across all seasons.
    pub absolute_number: Option<u32>,
}

/// All per-episode metadata available for one catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentBundle {
    pub media_id: MediaId,
    pub episode_count: Option<u32>,
    /// Regular episodes keyed by episode number.
    pub episodes: BTreeMap<u32, EpisodeRecord>,
    /// Specials keyed by special number (`S1`, `S2`, ...).
    pub specials: BTreeMap<u32, EpisodeRecord>,
}

impl EnrichmentBundle {
    #[must_use]
    pub fn new(media_id: MediaId) -> Self {
        Self {
            media_id,
            ..Self::default()
        }
    }

    /// Looks up a record by kind and number.
    #[must_use]
    pub fn lookup(&self, kind: EpisodeKind, number: u32) -> Option<&EpisodeRecord> {
        match kind {
            EpisodeKind::Main => self.episodes.get(&number),
            EpisodeKind::Special => self.specials.get(&number),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty() && self.specials.is_empty()
    }
}

/// Which episode list a file belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeKind {
    #[default]
    Main,
    Special,
}

/// Episode metadata attached to a local file by the hydrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMetadata {
    pub media_id: MediaId,
    pub kind: EpisodeKind,
    pub episode: u32,
    pub title: Option<String>,
    pub air_date: Option<String>,
    pub image: Option<String>,
    pub overview: Option<String>,
    pub length_minutes: Option<u32>,
    pub absolute_number: Option<u32>,
}

impl EpisodeMetadata {
    /// Projects a bundle record onto the fields a file carries.
    #[must_use]
    pub fn project(media_id: MediaId, kind: EpisodeKind, record: &EpisodeRecord) -> Self {
        Self {
            media_id,
            kind,
            episode: record.episode,
            title: record.title.clone(),
            air_date: record.air_date.clone(),
            image: record.image.clone(),
            overview: record.overview.clone(),
            length_minutes: record.length_minutes,
            absolute_number: record.absolute_number,
        }
    }
}
