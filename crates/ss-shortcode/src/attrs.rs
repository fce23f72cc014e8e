//! Shortcode attribute parsing.
//!
//! Parses the `name="value" name='value' name=value` list that follows the
//! `supersaas` keyword.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Options a shortcode may set. Everything else is parsed and dropped.
pub const SHORTCODE_OPTIONS: [&str; 3] = ["after", "label", "image"];

/// One attribute: double-quoted, single-quoted or bare, tried in that order.
/// Quoted values must be followed by whitespace or the end of the string.
static ATTR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"([A-Za-z0-9_]+)\s*=\s*"([^"]*)"(?:\s|$)"#,
        r"|([A-Za-z0-9_]+)\s*=\s*'([^']*)'(?:\s|$)",
        r#"|([A-Za-z0-9_]+)\s*=\s*([^\s'"]+)(?:\s|$)"#,
    ))
    .unwrap()
});

/// Whether `name` (already lowercased) is a recognized shortcode option.
#[must_use]
pub fn is_allowed_option(name: &str) -> bool {
    SHORTCODE_OPTIONS.contains(&name)
}

/// Recognized options from one shortcode, keyed by lowercase name.
///
/// # Example
///
/// ```
/// use ss_shortcode::AttributeMap;
///
/// let attrs = AttributeMap::parse(r#" label="Book Now" after=/thanks color=red"#);
/// assert_eq!(attrs.get("label"), Some("Book Now"));
/// assert_eq!(attrs.get("after"), Some("/thanks"));
/// assert_eq!(attrs.get("color"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeMap {
    attrs: HashMap<String, String>,
}

impl AttributeMap {
    /// Parse a raw attribute string.
    ///
    /// Never fails: fragments matching none of the three forms are skipped,
    /// unknown names are dropped and a repeated name keeps its last value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut map = Self::default();

        for caps in ATTR_PATTERN.captures_iter(raw) {
            let (name, value) = if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
                (name.as_str(), unescape(value.as_str()))
            } else if let (Some(name), Some(value)) = (caps.get(3), caps.get(4)) {
                (name.as_str(), unescape(value.as_str()))
            } else if let (Some(name), Some(value)) = (caps.get(5), caps.get(6)) {
                (name.as_str(), Cow::Borrowed(value.as_str()))
            } else {
                continue;
            };

            map.insert(name, value.into_owned());
        }

        map
    }

    /// Store `value` under the lowercased `name` if it is an allowed option.
    ///
    /// Returns whether the value was kept.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> bool {
        let name = name.to_ascii_lowercase();
        if !is_allowed_option(&name) {
            return false;
        }
        self.attrs.insert(name, value.into());
        true
    }

    /// Get an option value by lowercase name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Number of recognized options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether no recognized option was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// Interpret C-style backslash escapes in a quoted value.
///
/// Handles `\n \t \r \v \f \a \b`, octal `\ooo` and hex `\xhh`. Any other
/// escaped character stands for itself and a trailing backslash is dropped.
fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        i += 1;
        if byte != b'\\' {
            out.push(byte);
            continue;
        }

        let Some(&next) = bytes.get(i) else {
            break;
        };
        i += 1;

        match next {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'v' => out.push(0x0b),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'x' if bytes.get(i).is_some_and(u8::is_ascii_hexdigit) => {
                let len = leading_digits(&bytes[i..], 2, u8::is_ascii_hexdigit);
                out.push(digits_value(&bytes[i..i + len], 16));
                i += len;
            }
            b'0'..=b'7' => {
                let start = i - 1;
                let len = leading_digits(&bytes[start..], 3, |b| matches!(*b, b'0'..=b'7'));
                out.push(digits_value(&bytes[start..start + len], 8));
                i = start + len;
            }
            other => out.push(other),
        }
    }

    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

/// Count up to `max` leading bytes accepted by `accept`.
fn leading_digits(bytes: &[u8], max: usize, accept: impl Fn(&u8) -> bool) -> usize {
    bytes.iter().take(max).take_while(|b| accept(*b)).count()
}

/// Numeric value of ASCII digits in `radix`, wrapped to a byte.
fn digits_value(digits: &[u8], radix: u8) -> u8 {
    digits.iter().fold(0u8, |acc, &d| {
        let value = match d {
            b'0'..=b'9' => d - b'0',
            b'a'..=b'f' => d - b'a' + 10,
            b'A'..=b'F' => d - b'A' + 10,
            _ => 0,
        };
        acc.wrapping_mul(radix).wrapping_add(value)
    })
}
