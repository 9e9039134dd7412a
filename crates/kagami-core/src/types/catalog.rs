use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier of a work within the catalog (an AniList media id).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MediaId(pub u64);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MediaId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Format classification of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Tv,
    TvShort,
    Movie,
    Special,
    Ova,
    Ona,
    Music,
    #[default]
    Unknown,
}

impl MediaFormat {
    /// Parses an AniList `MediaFormat` enum value.
    #[must_use]
    pub fn from_anilist(value: &str) -> Self {
        match value {
            "TV" => Self::Tv,
            "TV_SHORT" => Self::TvShort,
            "MOVIE" => Self::Movie,
            "SPECIAL" => Self::Special,
            "OVA" => Self::Ova,
            "ONA" => Self::Ona,
            "MUSIC" => Self::Music,
            _ => Self::Unknown,
        }
    }

    /// Broadcast-style formats whose files carry regular episode numbers.
    #[must_use]
    pub fn is_episodic(self) -> bool {
        matches!(self, Self::Tv | Self::TvShort | Self::Ona)
    }

    /// Formats that release names tag as OVA/SP/Special.
    #[must_use]
    pub fn is_special(self) -> bool {
        matches!(self, Self::Special | Self::Ova | Self::Ona)
    }
}

/// One canonical media work. Immutable once loaded into a catalog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: MediaId,
    /// Primary (preferred) title.
    pub title: String,
    /// Alternative titles: other languages, romanizations, abbreviations.
    pub synonyms: BTreeSet<String>,
    /// Total episode count; `None` while airing or unknown.
    pub episode_count: Option<u32>,
    pub format: MediaFormat,
    /// Season number when known; otherwise inferred from titles at index time.
    pub season: Option<u32>,
    /// Year the work started airing.
    pub year: Option<u16>,
    /// Direct sequel, used to rebase absolute episode numbers.
    pub sequel: Option<MediaId>,
    /// Direct prequel.
    pub prequel: Option<MediaId>,
}

impl CatalogEntry {
    /// Creates an entry with only an id and a primary title.
    #[must_use]
    pub fn new(id: impl Into<MediaId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            synonyms: BTreeSet::new(),
            episode_count: None,
            format: MediaFormat::Unknown,
            season: None,
            year: None,
            sequel: None,
            prequel: None,
        }
    }

    #[must_use]
    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.insert(synonym.into());
        self
    }

    #[must_use]
    pub fn with_episodes(mut self, count: u32) -> Self {
        self.episode_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: MediaFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_sequel(mut self, sequel: impl Into<MediaId>) -> Self {
        self.sequel = Some(sequel.into());
        self
    }

    #[must_use]
    pub fn with_prequel(mut self, prequel: impl Into<MediaId>) -> Self {
        self.prequel = Some(prequel.into());
        self
    }

    /// Primary title followed by every synonym.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }

    /// Ids of directly related entries.
    pub fn relations(&self) -> impl Iterator<Item = MediaId> {
        self.sequel.into_iter().chain(self.prequel)
    }
}
