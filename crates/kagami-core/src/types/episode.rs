use std::fmt;

use serde::{Deserialize, Serialize};

/// Episode specification supporting the numbering schemes
/// found in anime release file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeSpec {
    /// Single episode: "01", "12", "1084"
    Single(u32),

    /// Episode range: "01-12", "01~12", "S01E01-E02"
    Range(u32, u32),

    /// Versioned episode: "12v2"
    Version {
        /// The episode number.
        episode: u32,
        /// The version number (e.g., v2 = 2).
        version: u8,
    },
}

impl EpisodeSpec {
    /// The episode a file is primarily about: the number itself,
    /// or the first episode of a range.
    #[must_use]
    pub fn primary(self) -> u32 {
        match self {
            Self::Single(ep) | Self::Version { episode: ep, .. } => ep,
            Self::Range(start, _) => start,
        }
    }

    /// The highest episode number covered.
    #[must_use]
    pub fn last(self) -> u32 {
        match self {
            Self::Single(ep) | Self::Version { episode: ep, .. } => ep,
            Self::Range(_, end) => end,
        }
    }

    /// Returns `true` for multi-episode specs.
    #[must_use]
    pub fn is_range(self) -> bool {
        matches!(self, Self::Range(..))
    }
}

impl fmt::Display for EpisodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(ep) => write!(f, "{ep:02}"),
            Self::Range(start, end) => write!(f, "{start:02}-{end:02}"),
            Self::Version { episode, version } => write!(f, "{episode:02}v{version}"),
        }
    }
}
