use std::fmt;

use serde::{Deserialize, Serialize};

/// Video resolution tag found in a release name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resolution {
    /// 480p - Standard Definition
    SD480,
    /// 576p - PAL Standard Definition
    SD576,
    /// 720p - High Definition
    HD720,
    /// 1080p - Full HD
    FHD1080,
    /// 2160p - Ultra HD / 4K
    UHD2160,
}

impl Resolution {
    /// Maps a vertical line count (as written in `1080p` or `1920x1080`).
    #[must_use]
    pub fn from_lines(lines: &str) -> Option<Self> {
        match lines {
            "480" => Some(Self::SD480),
            "576" => Some(Self::SD576),
            "720" => Some(Self::HD720),
            "1080" => Some(Self::FHD1080),
            "2160" => Some(Self::UHD2160),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SD480 => write!(f, "480p"),
            Self::SD576 => write!(f, "576p"),
            Self::HD720 => write!(f, "720p"),
            Self::FHD1080 => write!(f, "1080p"),
            Self::UHD2160 => write!(f, "2160p"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_ordering() {
        assert!(Resolution::UHD2160 > Resolution::FHD1080);
        assert!(Resolution::FHD1080 > Resolution::HD720);
        assert!(Resolution::SD576 > Resolution::SD480);
    }

    #[test]
    fn resolution_display() {
        assert_eq!(Resolution::FHD1080.to_string(), "1080p");
        assert_eq!(Resolution::UHD2160.to_string(), "2160p");
    }

    #[test]
    fn resolution_from_lines() {
        assert_eq!(Resolution::from_lines("720"), Some(Resolution::HD720));
        assert_eq!(Resolution::from_lines("1081"), None);
    }
}
