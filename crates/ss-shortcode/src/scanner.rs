//! Shortcode token scanner.
//!
//! Finds `[supersaas ...]` tokens in article text without parsing the
//! surrounding markup.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// `[supersaas<attrs>]`, case-insensitive. The lazy group stops at the first
/// `]`, so a `]` inside an attribute value ends the token early.
static SHORTCODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[supersaas(.*?)\]").unwrap());

/// A single shortcode occurrence in the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortcodeMatch<'a> {
    /// The whole token, brackets included.
    pub full_match: &'a str,
    /// Everything between `supersaas` and the closing `]`.
    pub raw_attrs: &'a str,
    /// Byte range of `full_match` in the source text.
    pub range: Range<usize>,
}

/// Iterate over every non-overlapping shortcode in `text`, left to right.
///
/// # Example
///
/// ```
/// use ss_shortcode::scan;
///
/// let text = r#"Intro [supersaas label="Book"] outro"#;
/// let found: Vec<_> = scan(text).collect();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].raw_attrs, r#" label="Book""#);
/// ```
pub fn scan(text: &str) -> impl Iterator<Item = ShortcodeMatch<'_>> {
    SHORTCODE_PATTERN.captures_iter(text).filter_map(|caps| {
        let full = caps.get(0)?;
        let attrs = caps.get(1)?;
        Some(ShortcodeMatch {
            full_match: full.as_str(),
            raw_attrs: attrs.as_str(),
            range: full.range(),
        })
    })
}

/// Number of shortcode tokens in `text`.
#[must_use]
pub fn count(text: &str) -> usize {
    SHORTCODE_PATTERN.find_iter(text).count()
}
