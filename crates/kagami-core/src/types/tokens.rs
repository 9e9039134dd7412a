use serde::{Deserialize, Serialize};

use super::episode::EpisodeSpec;
use super::quality::Resolution;

/// Marker flags picked up from a release name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseFlags {
    /// Multi-episode release ("Batch", "Complete", or an episode range).
    pub batch: bool,
    /// OVA/OAD/SP/Special, or season 0.
    pub special: bool,
    /// Creditless opening/ending (NCOP, NCED).
    pub creditless: bool,
    /// Theatrical release ("Movie", "Gekijouban").
    pub movie: bool,
}

/// Structured tokens extracted from a local file path.
///
/// Parsing is best-effort: every field but `title` and `season` may be
/// absent, and `title` may be empty when nothing title-like was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTokens {
    /// The file name the tokens were extracted from.
    pub input: String,

    /// Title fragment as written (not normalized). Empty if none.
    pub title: String,

    /// Title-like text from the parent folder, if any.
    pub folder_title: Option<String>,

    /// Season number; 1 when the name carries none.
    pub season: u32,

    /// Episode specification.
    pub episode: Option<EpisodeSpec>,

    /// Release group name (e.g., "SubsPlease", "Erai-raws").
    pub group: Option<String>,

    /// Video resolution.
    pub resolution: Option<Resolution>,

    /// Release year.
    pub year: Option<u16>,

    /// CRC32 checksum (hex string).
    pub crc32: Option<String>,

    /// File extension (without leading dot, lowercase).
    pub extension: Option<String>,

    /// Batch/special/creditless/movie markers.
    pub flags: ReleaseFlags,
}

impl ParsedTokens {
    /// Creates an empty token set for the given input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            title: String::new(),
            folder_title: None,
            season: 1,
            episode: None,
            group: None,
            resolution: None,
            year: None,
            crc32: None,
            extension: None,
            flags: ReleaseFlags::default(),
        }
    }

    /// Returns `true` if a title fragment was extracted.
    #[must_use]
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// The primary episode number, if any.
    #[must_use]
    pub fn episode_number(&self) -> Option<u32> {
        self.episode.map(EpisodeSpec::primary)
    }
}

impl std::fmt::Display for ParsedTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParsedTokens(title={:?}, season={}", self.title, self.season)?;
        if let Some(ref ep) = self.episode {
            write!(f, ", ep={ep}")?;
        }
        if let Some(ref res) = self.resolution {
            write!(f, ", res={res}")?;
        }
        if let Some(ref group) = self.group {
            write!(f, ", group={group:?}")?;
        }
        write!(f, ")")
    }
}
