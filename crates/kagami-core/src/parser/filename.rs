use std::ops::Range;
use std::path::Path;

use regex::Regex;
use tracing::trace;

use crate::error::Result;
use crate::types::{EpisodeSpec, ParsedTokens, Resolution};

/// Marks a consumed region of the working string. Title extraction takes
/// the text in front of the first sentinel.
const SENTINEL: char = '\x00';

/// Heuristic filename parser using pre-compiled regex patterns and
/// release naming conventions.
///
/// Parsing never fails. Names that cannot be broken down keep their stem
/// as the title with every numeric field unset.
pub struct FilenameParser {
    re_extension: Regex,
    re_group: Regex,
    re_square: Regex,
    re_bracket: Regex,
    re_crc32: Regex,
    re_crc32_tag: Regex,
    re_resolution: Regex,
    re_release_tags: Regex,
    re_year: Regex,
    re_season_episode: Regex,
    re_season_ordinal: Regex,
    re_season: Regex,
    re_episode_explicit: Regex,
    re_episode_range: Regex,
    re_episode_dash: Regex,
    re_episode_version: Regex,
    re_episode: Regex,
    re_bare_episode: Regex,
    re_version_tag: Regex,
    re_special: Regex,
    re_creditless: Regex,
    re_movie: Regex,
    re_batch: Regex,
    re_scene_group: Regex,
    re_season_folder: Regex,
}

impl FilenameParser {
    /// Constructs a new `FilenameParser` with pre-compiled regex patterns.
    ///
    /// # Errors
    ///
    /// Returns `KagamiError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_extension: Regex::new(r"\.([A-Za-z][A-Za-z0-9]{1,3})$")?,
            re_group: Regex::new(r"^\[([^\]]+)\]")?,
            re_square: Regex::new(r"\[([^\]]*)\]")?,
            re_bracket: Regex::new(r"\[[^\]]*\]|\([^\)]*\)")?,
            re_crc32: Regex::new(r"[\[\(]([0-9A-Fa-f]{8})[\]\)]")?,
            re_crc32_tag: Regex::new(r"^[0-9A-Fa-f]{8}$")?,
            re_resolution: Regex::new(
                r"(?i)\b(?:(2160|1080|720|576|480)[pi]|\d{3,4}x(2160|1080|720|576|480)|(4k|uhd))\b",
            )?,
            re_release_tags: Regex::new(
                r"(?i)\b(?:x\.?26[45]|h\.?26[45]|hevc|avc|av1|vp9|xvid|10-?bit|8-?bit|hi10p?|flac|aac|opus|e?-?ac-?3|dts(?:-?hd)?|truehd|[257]\.[01]|dual[\s\.\-]?audio|multi[\s\.\-]?subs?|bd-?remux|remux|blu-?ray|bd(?:rip)?|web-?dl|web-?rip|web|hdtv|dvd(?:rip)?|vostfr|raw)\b",
            )?,
            re_year: Regex::new(r"\b((?:19|20)\d{2})\b")?,
            re_season_episode: Regex::new(
                r"(?i)\bS(\d{1,2})[\s\.]?E(\d{1,4})(?:v(\d))?(?:[\s\.]?[-~][\s\.]?E?(\d{1,4}))?\b",
            )?,
            re_season_ordinal: Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\s+season\b")?,
            re_season: Regex::new(r"(?i)\b(?:s|season\s*)(\d{1,2})\b")?,
            re_episode_explicit: Regex::new(
                r"(?i)(?:^|[\s\-_\.\[\(])(?:episode|ep|e)[\s\.]?(\d{1,4})(?:v(\d))?\b",
            )?,
            re_episode_range: Regex::new(
                r"(?:^|[\s_\.\-])(\d{1,4})(?:[-~]|\s~\s)(\d{1,4})\b",
            )?,
            re_episode_dash: Regex::new(r"\s[-–]\s+(\d{1,4})(?:v(\d))?\b")?,
            re_episode_version: Regex::new(r"(?:^|[\s_\.\-])(\d{1,4})v(\d)\b")?,
            re_episode: Regex::new(r"(?:^|[\s_\.\-])(\d{1,4})\b")?,
            re_bare_episode: Regex::new(r"^(\d{1,4})(?:v(\d))?$")?,
            re_version_tag: Regex::new(r"(?i)^v\d$")?,
            re_special: Regex::new(r"(?i)\b(?:ova|oad|ona|sp\d{0,2}|specials?)\b")?,
            re_creditless: Regex::new(r"(?i)\b(?:nc(?:op|ed)\d{0,2}|creditless)\b")?,
            re_movie: Regex::new(r"(?i)\b(?:movie|gekijouban)\b")?,
            re_batch: Regex::new(r"(?i)\b(?:batch|complete)\b")?,
            re_scene_group: Regex::new(r"-([A-Za-z0-9]+)$")?,
            re_season_folder: Regex::new(r"(?i)^(?:season|s)\s*(\d{1,2})$")?,
        })
    }

    /// Parses a file path: the file name supplies the tokens, the parent
    /// folders fill in a missing title or season.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use kagami_core::parser::FilenameParser;
    ///
    /// let parser = FilenameParser::new().unwrap();
    /// let tokens = parser.parse_path(Path::new("/anime/Show Name/Season 2/05.mkv"));
    ///
    /// assert_eq!(tokens.title, "Show Name");
    /// assert_eq!(tokens.season, 2);
    /// assert_eq!(tokens.episode_number(), Some(5));
    /// ```
    pub fn parse_path(&self, path: &Path) -> ParsedTokens {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let (mut tokens, season_explicit) = self.parse_name(&name);

        let mut folders = path
            .parent()
            .into_iter()
            .flat_map(Path::ancestors)
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned());

        let mut folder = folders.next();
        if let Some(season) = folder.as_deref().and_then(|f| self.season_folder(f)) {
            if !season_explicit {
                tokens.season = season;
            }
            folder = folders.next();
        }

        tokens.folder_title = folder
            .map(|f| self.parse_name(&f).0.title)
            .filter(|t| !t.is_empty());

        if !tokens.has_title() {
            if let Some(ref folder_title) = tokens.folder_title {
                tokens.title = folder_title.clone();
            }
        }

        trace!(path = %path.display(), %tokens, "parsed path");
        tokens
    }

    /// Parses a bare file name (no folder context).
    ///
    /// # Examples
    /// ```
    /// use kagami_core::parser::FilenameParser;
    ///
    /// let parser = FilenameParser::new().unwrap();
    /// let tokens = parser.parse("[SubsPlease] Jujutsu Kaisen - 24 (1080p) [A1B2C3D4].mkv");
    ///
    /// assert_eq!(tokens.title, "Jujutsu Kaisen");
    /// assert_eq!(tokens.group.as_deref(), Some("SubsPlease"));
    /// assert_eq!(tokens.episode_number(), Some(24));
    /// ```
    pub fn parse(&self, name: &str) -> ParsedTokens {
        self.parse_name(name).0
    }

    fn parse_name(&self, name: &str) -> (ParsedTokens, bool) {
        let trimmed = name.trim();
        let mut tokens = ParsedTokens::new(trimmed);
        if trimmed.is_empty() {
            return (tokens, false);
        }

        tokens.extension = self.extract_extension(trimmed);
        let stem = match tokens.extension {
            Some(ref ext) => &trimmed[..trimmed.len() - ext.len() - 1],
            None => trimmed,
        };

        // Extract structured metadata (order matters for disambiguation);
        // every consumed region is masked in `work`.
        let leading = self
            .re_group
            .captures(stem)
            .map(|c| (c[0].len(), c[1].trim().to_string()))
            .filter(|(_, group)| !self.is_metadata_tag(group));
        let mut work = match leading {
            Some((end, group)) => {
                tokens.group = Some(group);
                stem[end..].to_string()
            }
            None => stem.to_string(),
        };

        tokens.crc32 = self.extract_crc32(&mut work);
        tokens.resolution = self.extract_resolution(&mut work);
        mask_all(&self.re_release_tags, &mut work);
        tokens.year = self.extract_year(&mut work);

        let season = match self.extract_season_episode(&mut work) {
            Some((season, episode)) => {
                tokens.episode = Some(episode);
                Some(season)
            }
            None => {
                let season = self.extract_season(&mut work);
                tokens.episode = self.extract_episode(&mut work, tokens.year);
                season
            }
        };

        tokens.flags.special = mask_all(&self.re_special, &mut work) || season == Some(0);
        tokens.flags.creditless = mask_all(&self.re_creditless, &mut work);
        tokens.flags.movie = mask_all(&self.re_movie, &mut work);
        tokens.flags.batch = mask_all(&self.re_batch, &mut work)
            || tokens.episode.is_some_and(EpisodeSpec::is_range);

        // A bare number is only the episode when nothing else claimed one.
        let bare_episode = tokens.episode.is_none();
        if bare_episode {
            tokens.episode = self.extract_bare_episode(&work);
        }

        tokens.title = self.extract_title(&work, bare_episode);
        if tokens.group.is_none() {
            tokens.group = self.extract_trailing_group(stem);
        }
        if let Some(s) = season {
            tokens.season = s;
        }

        if tokens.title.is_empty() && tokens.episode.is_none() {
            // Nothing recognizable: keep the stem, drop the numbers.
            tokens.title = stem.trim().to_string();
            tokens.season = 1;
            tokens.year = None;
            return (tokens, false);
        }

        (tokens, season.is_some())
    }

    fn extract_extension(&self, input: &str) -> Option<String> {
        self.re_extension
            .captures(input)
            .map(|c| c[1].to_lowercase())
    }

    fn extract_crc32(&self, work: &mut String) -> Option<String> {
        let (range, crc) = {
            let caps = self.re_crc32.captures(work)?;
            (caps.get(0)?.range(), caps[1].to_uppercase())
        };
        mask(work, range);
        Some(crc)
    }

    fn extract_resolution(&self, work: &mut String) -> Option<Resolution> {
        let resolution = self.re_resolution.captures(work).and_then(|c| {
            if c.get(3).is_some() {
                return Some(Resolution::UHD2160);
            }
            c.get(1)
                .or_else(|| c.get(2))
                .and_then(|m| Resolution::from_lines(m.as_str()))
        });
        mask_all(&self.re_resolution, work);
        resolution
    }

    fn extract_year(&self, work: &mut String) -> Option<u16> {
        let caps = self.re_year.captures(work)?;
        let year: u16 = caps[1].parse().ok()?;
        if !(1950..=2035).contains(&year) {
            return None;
        }

        // Only a bracketed year is clearly not part of the title.
        let range = caps.get(0)?.range();
        let bytes = work.as_bytes();
        let opened = range.start > 0 && matches!(bytes[range.start - 1], b'(' | b'[');
        let closed = range.end < bytes.len() && matches!(bytes[range.end], b')' | b']');
        if opened && closed {
            mask(work, range.start - 1..range.end + 1);
        }
        Some(year)
    }

    /// `S02E05`, `S01E01-E02`, `S01E03v2`.
    fn extract_season_episode(&self, work: &mut String) -> Option<(u32, EpisodeSpec)> {
        let (range, season, episode) = self.re_season_episode.captures(work).and_then(|c| {
            let season: u32 = c[1].parse().ok()?;
            let start: u32 = c[2].parse().ok()?;
            let version = c.get(3).and_then(|m| m.as_str().parse::<u8>().ok());
            let end = c.get(4).and_then(|m| m.as_str().parse::<u32>().ok());

            let episode = match (end, version) {
                (Some(end), _) if end > start => EpisodeSpec::Range(start, end),
                (_, Some(version)) => EpisodeSpec::Version {
                    episode: start,
                    version,
                },
                _ => EpisodeSpec::Single(start),
            };
            Some((c.get(0)?.range(), season, episode))
        })?;
        mask(work, range);
        Some((season, episode))
    }

    /// `2nd Season`, `Season 2`, `S2`.
    fn extract_season(&self, work: &mut String) -> Option<u32> {
        for re in [&self.re_season_ordinal, &self.re_season] {
            let found = re
                .captures(work)
                .and_then(|c| Some((c.get(0)?.range(), c[1].parse::<u32>().ok()?)));
            if let Some((range, season)) = found {
                mask(work, range);
                return Some(season);
            }
        }
        None
    }

    fn extract_episode(&self, work: &mut String, year: Option<u16>) -> Option<EpisodeSpec> {
        // Explicit marker: "E05", "Ep 05", "Episode 5"
        if let Some((range, ep, version)) = capture_episode(&self.re_episode_explicit, work) {
            mask(work, range);
            return Some(with_version(ep, version));
        }

        // Range: "01-12", "01~12"
        let range_found = self.re_episode_range.captures(work).and_then(|c| {
            let start: u32 = c[1].parse().ok()?;
            let end: u32 = c[2].parse().ok()?;
            (start < end).then_some((c.get(0)?.range(), start, end))
        });
        if let Some((range, start, end)) = range_found {
            mask(work, range);
            return Some(EpisodeSpec::Range(start, end));
        }

        // Dash-separated: "Title - 05", "Title - 05v2"
        if let Some((range, ep, version)) = capture_episode(&self.re_episode_dash, work) {
            mask(work, range);
            return Some(with_version(ep, version));
        }

        // Versioned: "12v2"
        if let Some((range, ep, version)) = capture_episode(&self.re_episode_version, work) {
            mask(work, range);
            return Some(with_version(ep, version));
        }

        // Any separated number that is not the release year
        let found = self.re_episode.captures_iter(work).find_map(|c| {
            let digits = &c[1];
            let ep: u32 = digits.parse().ok()?;
            let is_year = digits.len() == 4 && year.is_some_and(|y| u32::from(y) == ep);
            (!is_year).then_some((c.get(0)?.range(), ep))
        });
        let (range, ep) = found?;
        mask(work, range);
        Some(EpisodeSpec::Single(ep))
    }

    /// A name that is nothing but a number ("05.mkv").
    fn extract_bare_episode(&self, work: &str) -> Option<EpisodeSpec> {
        let residual = self.residual(work);
        let caps = self.re_bare_episode.captures(residual.trim())?;
        let ep: u32 = caps[1].parse().ok()?;
        let version = caps.get(2).and_then(|m| m.as_str().parse::<u8>().ok());
        Some(with_version(ep, version))
    }

    /// Extracts the title from the text in front of the first consumed
    /// metadata token. A purely numeric region is dropped when it was read
    /// as the episode.
    fn extract_title(&self, work: &str, bare_episode: bool) -> String {
        let without_tags = self.re_bracket.replace_all(work, " ");
        let region = without_tags.split(SENTINEL).next().unwrap_or("");
        if bare_episode && self.re_bare_episode.is_match(region.trim()) {
            return String::new();
        }

        region
            .replace(['.', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .trim_matches(|c: char| c == '-' || c == '~' || c == ' ')
            .to_string()
    }

    /// Release group written after the title: the last square-bracket tag
    /// that is not metadata, else a scene-style `-GROUP` suffix.
    fn extract_trailing_group(&self, stem: &str) -> Option<String> {
        let bracketed = self
            .re_square
            .captures_iter(stem)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|tag| !self.is_metadata_tag(tag))
            .last();
        if let Some(tag) = bracketed {
            return Some(tag.to_string());
        }

        if stem.contains(' ') {
            return None;
        }
        self.re_scene_group
            .captures(stem)
            .map(|c| c[1].to_string())
            .filter(|tag| !self.is_metadata_tag(tag))
    }

    fn is_metadata_tag(&self, tag: &str) -> bool {
        tag.is_empty()
            || tag.chars().all(|c| c.is_ascii_digit())
            || self.re_crc32_tag.is_match(tag)
            || self.re_version_tag.is_match(tag)
            || [
                &self.re_resolution,
                &self.re_release_tags,
                &self.re_year,
                &self.re_season_episode,
                &self.re_special,
                &self.re_creditless,
                &self.re_batch,
                &self.re_movie,
            ]
            .iter()
            .any(|re| re.is_match(tag))
    }

    fn season_folder(&self, folder: &str) -> Option<u32> {
        self.re_season_folder
            .captures(folder.trim())
            .and_then(|c| c[1].parse().ok())
    }

    /// Unconsumed text with bracketed tags removed.
    fn residual(&self, work: &str) -> String {
        self.re_bracket
            .replace_all(work, " ")
            .chars()
            .filter(|&c| c != SENTINEL)
            .collect()
    }
}

fn mask(work: &mut String, range: Range<usize>) {
    let blank = SENTINEL.to_string().repeat(range.len());
    work.replace_range(range, &blank);
}

/// Masks every match; returns whether anything matched.
fn mask_all(re: &Regex, work: &mut String) -> bool {
    let ranges: Vec<Range<usize>> = re.find_iter(work).map(|m| m.range()).collect();
    let found = !ranges.is_empty();
    for range in ranges {
        mask(work, range);
    }
    found
}

fn capture_episode(re: &Regex, work: &str) -> Option<(Range<usize>, u32, Option<u8>)> {
    let caps = re.captures(work)?;
    let ep: u32 = caps[1].parse().ok()?;
    let version = caps.get(2).and_then(|m| m.as_str().parse::<u8>().ok());
    Some((caps.get(0)?.range(), ep, version))
}

fn with_version(episode: u32, version: Option<u8>) -> EpisodeSpec {
    match version {
        Some(version) => EpisodeSpec::Version { episode, version },
        None => EpisodeSpec::Single(episode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> FilenameParser {
        FilenameParser::new().unwrap()
    }

    #[test]
    fn empty_input_yields_empty_tokens() {
        let p = parser();
        let t = p.parse("   ");
        assert!(!t.has_title());
        assert_eq!(t.episode, None);
        assert_eq!(t.season, 1);
    }

    #[test]
    fn season_episode_with_trailing_group() {
        let t = parser().parse("Show Name S02E05 [1080p][GroupX].mkv");

        assert_eq!(t.title, "Show Name");
        assert_eq!(t.season, 2);
        assert_eq!(t.episode, Some(EpisodeSpec::Single(5)));
        assert_eq!(t.resolution.map(|r| r.to_string()).as_deref(), Some("1080p"));
        assert_eq!(t.group.as_deref(), Some("GroupX"));
        assert_eq!(t.extension.as_deref(), Some("mkv"));
    }

    #[test]
    fn plain_name_has_no_episode() {
        let t = parser().parse("Random Video.mp4");

        assert_eq!(t.title, "Random Video");
        assert_eq!(t.episode, None);
        assert_eq!(t.season, 1);
        assert_eq!(t.group, None);
    }

    #[test]
    fn subsplease_standard_format() {
        let t = parser().parse("[SubsPlease] Jujutsu Kaisen - 24 (1080p) [A1B2C3D4].mkv");

        assert_eq!(t.title, "Jujutsu Kaisen");
        assert_eq!(t.group.as_deref(), Some("SubsPlease"));
        assert_eq!(t.episode, Some(EpisodeSpec::Single(24)));
        assert_eq!(t.resolution, Some(Resolution::FHD1080));
        assert_eq!(t.crc32.as_deref(), Some("A1B2C3D4"));
    }

    #[test]
    fn erai_raws_versioned_episode() {
        let t = parser()
            .parse("[Erai-raws] Shingeki no Kyojin - The Final Season - 28v2 [1080p][HEVC].mkv");

        assert_eq!(t.group.as_deref(), Some("Erai-raws"));
        assert_eq!(t.title, "Shingeki no Kyojin - The Final Season");
        assert_eq!(
            t.episode,
            Some(EpisodeSpec::Version {
                episode: 28,
                version: 2
            })
        );
    }

    #[test]
    fn batch_episode_range() {
        let t = parser().parse("[Judas] Golden Kamuy S3 - 01-12 (1080p) [Batch]");

        assert_eq!(t.title, "Golden Kamuy");
        assert_eq!(t.season, 3);
        assert_eq!(t.episode, Some(EpisodeSpec::Range(1, 12)));
        assert!(t.flags.batch);
    }

    #[test]
    fn dot_separated_format() {
        let t = parser().parse("One.Piece.1084.VOSTFR.1080p.WEB.x264-AAC.mkv");

        assert_eq!(t.title, "One Piece");
        assert_eq!(t.episode, Some(EpisodeSpec::Single(1084)));
        assert_eq!(t.resolution, Some(Resolution::FHD1080));
        assert_eq!(t.group, None);
    }

    #[test]
    fn scene_group_suffix() {
        let t = parser().parse("Show.Name.S01E03.1080p.WEB-DL-GRP.mkv");

        assert_eq!(t.title, "Show Name");
        assert_eq!(t.season, 1);
        assert_eq!(t.episode_number(), Some(3));
        assert_eq!(t.group.as_deref(), Some("GRP"));
    }

    #[test]
    fn number_in_title_is_kept() {
        let t = parser().parse("[Group] Mob Psycho 100 - 05 [720p].mkv");

        assert_eq!(t.title, "Mob Psycho 100");
        assert_eq!(t.episode_number(), Some(5));
        assert_eq!(t.resolution, Some(Resolution::HD720));
    }

    #[test]
    fn ordinal_season_is_extracted() {
        let t = parser().parse("[Group] Re Zero 2nd Season - 05.mkv");

        assert_eq!(t.title, "Re Zero");
        assert_eq!(t.season, 2);
        assert_eq!(t.episode_number(), Some(5));
    }

    #[test]
    fn explicit_episode_marker() {
        let t = parser().parse("Show Name Episode 7.mkv");
        assert_eq!(t.title, "Show Name");
        assert_eq!(t.episode_number(), Some(7));

        let t = parser().parse("Show Name E12.mp4");
        assert_eq!(t.episode_number(), Some(12));
    }

    #[test]
    fn multi_episode_season_file() {
        let t = parser().parse("Show Name S01E01-E02.mkv");
        assert_eq!(t.episode, Some(EpisodeSpec::Range(1, 2)));
        assert!(t.flags.batch);
    }

    #[test]
    fn season_zero_is_special() {
        let t = parser().parse("Show Name S00E03.mkv");
        assert!(t.flags.special);
        assert_eq!(t.season, 0);
        assert_eq!(t.episode_number(), Some(3));
    }

    #[test]
    fn special_and_creditless_flags() {
        let t = parser().parse("[Group] Show Name OVA - 02 [1080p].mkv");
        assert!(t.flags.special);
        assert_eq!(t.title, "Show Name");
        assert_eq!(t.episode_number(), Some(2));

        let t = parser().parse("[Group] Show Name - NCOP1 [1080p].mkv");
        assert!(t.flags.creditless);
        assert_eq!(t.title, "Show Name");
    }

    #[test]
    fn bracketed_year_is_extracted() {
        let t = parser().parse("[Group] Title (2024) - 01 (1080p).mkv");
        assert_eq!(t.year, Some(2024));
        assert_eq!(t.title, "Title");
        assert_eq!(t.episode_number(), Some(1));
    }

    #[test]
    fn audio_channels_are_not_episodes() {
        let t = parser().parse("Show Name AAC 5.1 1080p.mkv");
        assert_eq!(t.title, "Show Name");
        assert_eq!(t.episode, None);
    }

    #[test]
    fn bare_number_has_no_title() {
        let t = parser().parse("05.mkv");
        assert_eq!(t.title, "");
        assert_eq!(t.episode_number(), Some(5));
    }

    #[test]
    fn numeric_title_survives_dash_episode() {
        let t = parser().parse("[Group] 86 - 05.mkv");
        assert_eq!(t.title, "86");
        assert_eq!(t.group.as_deref(), Some("Group"));
        assert_eq!(t.episode_number(), Some(5));
    }

    #[test]
    fn unrecoverable_name_keeps_stem() {
        let t = parser().parse("[1080p] [HEVC].mkv");
        assert_eq!(t.title, "[1080p] [HEVC]");
        assert_eq!(t.episode, None);
        assert_eq!(t.year, None);
        assert_eq!(t.season, 1);
    }

    #[test]
    fn path_uses_folder_title_and_season() {
        let p = parser();
        let t = p.parse_path(Path::new("/media/anime/Show Name/Season 2/05.mkv"));
        assert_eq!(t.title, "Show Name");
        assert_eq!(t.folder_title.as_deref(), Some("Show Name"));
        assert_eq!(t.season, 2);
        assert_eq!(t.episode_number(), Some(5));
    }

    #[test]
    fn explicit_season_beats_season_folder() {
        let t = parser().parse_path(Path::new("/anime/Show/Season 1/Show S03E02.mkv"));
        assert_eq!(t.season, 3);
        assert_eq!(t.title, "Show");
    }

    #[test]
    fn path_keeps_filename_title() {
        let t = parser().parse_path(Path::new(
            "/anime/[Group] Other Folder (2020)/[Group] Show Name - 03.mkv",
        ));
        assert_eq!(t.title, "Show Name");
        assert_eq!(t.folder_title.as_deref(), Some("Other Folder"));
    }

    #[test]
    fn parsing_is_deterministic() {
        let p = parser();
        let name = "[Group] Show Name - 05v2 [1080p][ABCDEF01].mkv";
        assert_eq!(p.parse(name), p.parse(name));
    }
}
