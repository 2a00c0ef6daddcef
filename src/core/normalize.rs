//! Accent- and case-insensitive text normalization for search
//!
//! Tuned for Vietnamese but works for any script whose accents decompose
//! into combining marks under NFD.

use unicode_normalization::UnicodeNormalization;

/// Normalize an optional string for accent-insensitive comparison.
///
/// `None` yields the empty string.
///
/// # Examples
///
/// ```
/// use choir::core::normalize::normalize;
///
/// assert_eq!(normalize(Some("Đức Mẹ")), "duc me");
/// assert_eq!(normalize(Some("ƯỚT")), "uot");
/// assert_eq!(normalize(None), "");
/// ```
pub fn normalize(input: Option<&str>) -> String {
    input.map(normalize_str).unwrap_or_default()
}

/// Normalize a string: lower-case, map the stroke letter to `d`, decompose,
/// drop combining diacritical marks.
pub fn normalize_str(input: &str) -> String {
    // Lower-casing last could reintroduce marks (`İ` lowers to `i` + U+0307).
    // `đ` has no canonical decomposition, so it is mapped by hand.
    input
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            other => other,
        })
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Whether `haystack` contains `needle` once both are normalized.
pub fn contains(haystack: &str, needle: &str) -> bool {
    normalize_str(haystack).contains(&normalize_str(needle))
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}
