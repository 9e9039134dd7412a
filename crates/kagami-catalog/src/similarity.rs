//! Title similarity on normalized strings.

use kagami_core::normalize::tokens;
use strsim::normalized_levenshtein;

/// Similarity of two normalized titles in `[0.0, 1.0]`.
///
/// The larger of the token Dice coefficient (word overlap, order-free) and
/// the normalized Levenshtein similarity (typos, spacing). Empty input on
/// either side scores 0.
///
/// # Examples
/// ```
/// use kagami_catalog::similarity::title_similarity;
///
/// assert_eq!(title_similarity("show name", "show name"), 1.0);
/// assert_eq!(title_similarity("name show", "show name"), 1.0);
/// assert_eq!(title_similarity("", "show name"), 0.0);
/// ```
#[must_use]
pub fn title_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    token_dice(a, b)
        .max(normalized_levenshtein(a, b))
        .clamp(0.0, 1.0)
}

/// Dice coefficient over the whitespace tokens of both titles, counting
/// repeated tokens (multiset intersection).
#[must_use]
pub fn token_dice(a: &str, b: &str) -> f64 {
    let mut left: Vec<&str> = tokens(a).collect();
    let mut right: Vec<&str> = tokens(b).collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    left.sort_unstable();
    right.sort_unstable();

    let (mut i, mut j, mut shared) = (0, 0, 0usize);
    while i < left.len() && j < right.len() {
        match left[i].cmp(right[j]) {
            std::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }

    (2 * shared) as f64 / (left.len() + right.len()) as f64
}
