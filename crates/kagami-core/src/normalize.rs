//! # Title Normalizer
//!
//! Turns raw titles (catalog titles, synonyms, parsed filename fragments)
//! into a comparable form: bracketed tags removed, diacritics stripped,
//! lowercased, punctuation turned into single spaces.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Bracket pairs whose content is dropped (release tags, years, notes).
const BRACKETS: &[(char, char)] = &[('[', ']'), ('(', ')'), ('{', '}'), ('【', '】')];

/// Characters removed without leaving a separator ("Don't" -> "dont").
const APOSTROPHES: &[char] = &['\'', '’', '‘', '`'];

/// Roman numerals accepted as trailing season markers.
const ROMAN_SEASONS: &[(&str, u32)] = &[("ii", 2), ("iii", 3), ("iv", 4)];

/// Normalizes a raw title.
///
/// Total and idempotent: `normalize(&normalize(s)) == normalize(s)`.
/// A title that consists only of bracketed text keeps that text.
///
/// # Examples
/// ```
/// use kagami_core::normalize::normalize;
///
/// assert_eq!(normalize("[SubsPlease] Kaguya-sama: Love Is War"), "kaguya sama love is war");
/// assert_eq!(normalize("Pokémon"), "pokemon");
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    let decomposed: String = input.nfkd().filter(|c| !is_combining_mark(*c)).collect();

    let stripped = strip_brackets(&decomposed);
    let folded = fold(&stripped);
    if folded.is_empty() {
        // Titles like "[Oshi no Ko]" are entirely bracketed.
        fold(&decomposed)
    } else {
        folded
    }
}

/// Splits a trailing season marker off a normalized title.
///
/// Recognizes `2nd season`, `season 2`, `s2` and the roman numerals
/// `ii`..`iv`. The marker is only removed when a non-empty base remains.
///
/// # Examples
/// ```
/// use kagami_core::normalize::split_season_hint;
///
/// assert_eq!(split_season_hint("show name 2nd season"), ("show name".to_string(), Some(2)));
/// assert_eq!(split_season_hint("show name"), ("show name".to_string(), None));
/// ```
#[must_use]
pub fn split_season_hint(normalized: &str) -> (String, Option<u32>) {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let n = tokens.len();

    let hint = if n >= 3 && tokens[n - 1] == "season" {
        ordinal(tokens[n - 2]).map(|s| (2, s))
    } else if n >= 3 && tokens[n - 2] == "season" {
        tokens[n - 1].parse().ok().map(|s| (2, s))
    } else if n >= 2 {
        season_token(tokens[n - 1]).map(|s| (1, s))
    } else {
        None
    };

    match hint {
        Some((width, season)) => (tokens[..n - width].join(" "), Some(season)),
        None => (tokens.join(" "), None),
    }
}

/// Whitespace-separated tokens of a normalized title.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}

fn strip_brackets(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if let Some(&(_, close)) = BRACKETS.iter().find(|(open, _)| *open == c) {
            // Unbalanced openers are kept and become separators later.
            if let Some(offset) = chars[i + 1..].iter().position(|&x| x == close) {
                out.push(' ');
                i += offset + 2;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }

    out
}

fn fold(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if APOSTROPHES.contains(&c) {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// "2nd" -> 2, "3rd" -> 3, "10th" -> 10.
fn ordinal(token: &str) -> Option<u32> {
    let digits = token
        .strip_suffix("st")
        .or_else(|| token.strip_suffix("nd"))
        .or_else(|| token.strip_suffix("rd"))
        .or_else(|| token.strip_suffix("th"))?;
    digits.parse().ok()
}

/// "s2" / "s02" -> 2, "ii" -> 2.
fn season_token(token: &str) -> Option<u32> {
    if let Some(digits) = token.strip_prefix('s') {
        if (1..=2).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
            return digits.parse().ok();
        }
    }
    ROMAN_SEASONS
        .iter()
        .find(|(numeral, _)| *numeral == token)
        .map(|&(_, season)| season)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_case() {
        assert_eq!(normalize("Show Name"), "show name");
        assert_eq!(normalize("  Show.Name__S1  "), "show name s1");
        assert_eq!(normalize("Re:Zero - Starting Life"), "re zero starting life");
        assert_eq!(normalize("Don't Toy with Me"), "dont toy with me");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize("Pokémon"), "pokemon");
        assert_eq!(normalize("Shōwa Genroku Rakugo Shinjū"), "showa genroku rakugo shinju");
    }

    #[test]
    fn removes_bracketed_tags() {
        assert_eq!(normalize("[SubsPlease] Show Name (2024) [1080p]"), "show name");
        assert_eq!(normalize("Show {v2} Name"), "show name");
        assert_eq!(normalize("Show [unclosed"), "show unclosed");
    }

    #[test]
    fn fully_bracketed_title_keeps_text() {
        assert_eq!(normalize("[Oshi no Ko]"), "oshi no ko");
        assert_eq!(normalize("【推しの子】"), "推しの子");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "",
            "Show Name S02E05 [1080p][GroupX]",
            "[Oshi no Ko]",
            "Pokémon: The Series (XY)",
            "½ ⑴ ﬁle ℌ İstanbul",
            "ＦＵＬＬＷＩＤＴＨ　Ｔｉｔｌｅ",
            "Shingeki no Kyojin - The Final Season",
            "a  [b] (c) {d} 【e】 ]f[",
            "進撃の巨人",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn season_hint_ordinal() {
        assert_eq!(
            split_season_hint("show name 2nd season"),
            ("show name".into(), Some(2))
        );
        assert_eq!(
            split_season_hint("show name 3rd season"),
            ("show name".into(), Some(3))
        );
    }

    #[test]
    fn season_hint_word_and_short_forms() {
        assert_eq!(split_season_hint("show name season 2"), ("show name".into(), Some(2)));
        assert_eq!(split_season_hint("show name s02"), ("show name".into(), Some(2)));
        assert_eq!(split_season_hint("show name ii"), ("show name".into(), Some(2)));
    }

    #[test]
    fn season_hint_keeps_non_empty_base() {
        assert_eq!(split_season_hint("s2"), ("s2".into(), None));
        assert_eq!(split_season_hint("season 2"), ("season 2".into(), None));
        assert_eq!(split_season_hint("mob psycho 100"), ("mob psycho 100".into(), None));
        assert_eq!(split_season_hint(""), (String::new(), None));
    }

    #[test]
    fn tokens_split_on_whitespace() {
        assert_eq!(tokens("a b  c").collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
