//! Generic-syntax parsing.
//!
//! The split into the five top-level components is delegated to the
//! `regex` engine running the fixed pattern of [RFC 3986 Appendix B].
//! The compiled pattern is process-wide immutable state built exactly
//! once; each call owns its capture state, so parallel crawler workers
//! can parse concurrently without sharing anything mutable.
//!
//! [RFC 3986 Appendix B]: https://datatracker.ietf.org/doc/html/rfc3986#appendix-B

pub(crate) mod char;

use std::sync::OnceLock;

use regex::Regex;

use crate::uri::Uri;

/// Generic-syntax pattern, anchored.
///
/// Capture groups: 2 = scheme, 4 = authority, 5 = path, 7 = query,
/// 9 = fragment. The pattern is total over all input strings, so a
/// successful compile guarantees every `captures()` call matches.
const GENERIC_SYNTAX: &str = r"^(([^:/?#]+):)?(//([^/?#]*))?([^?#]*)(\?([^#]*))?(#(.*))?";

/// Capture group index of the scheme.
const GROUP_SCHEME: usize = 2;
/// Capture group index of the authority.
const GROUP_AUTHORITY: usize = 4;
/// Capture group index of the path.
const GROUP_PATH: usize = 5;
/// Capture group index of the query.
const GROUP_QUERY: usize = 7;
/// Capture group index of the fragment.
const GROUP_FRAGMENT: usize = 9;

/// Returns the compiled generic-syntax pattern, building it on first use.
fn generic_syntax() -> &'static Regex {
    /// Compile-once storage for the shared pattern.
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(GENERIC_SYNTAX).expect("the generic-syntax pattern is a valid regex")
    })
}

/// Splits a raw string into a [`Uri`] record.
///
/// Each optional component is absent (`None`) when its delimiter did not
/// participate in the match, and present-empty (`Some("")`) when the
/// delimiter matched with empty content; the pattern engine's per-group
/// participation reporting distinguishes the two. The path is always
/// present, possibly empty. Host, ip, port and the authority kind are
/// reset; classification happens later in [`normalize::authority`].
///
/// The generic-syntax pattern matches every input string, so parsing is
/// total: there is no "no match" case for a caller to handle.
///
/// # Examples
///
/// ```
/// use urinorm::parser;
///
/// let uri = parser::parse("http://www.ics.uci.edu/pub/ietf/uri/#Related");
/// assert_eq!(uri.scheme.as_deref(), Some("http"));
/// assert_eq!(uri.authority.as_deref(), Some("www.ics.uci.edu"));
/// assert_eq!(uri.path, "/pub/ietf/uri/");
/// assert_eq!(uri.query, None);
/// assert_eq!(uri.fragment.as_deref(), Some("Related"));
/// ```
///
/// [`normalize::authority`]: crate::normalize::authority
#[must_use]
pub fn parse(raw: &str) -> Uri {
    let caps = generic_syntax()
        .captures(raw)
        .expect("the generic-syntax pattern matches every input");

    let mut uri = Uri::new();
    uri.scheme = caps.get(GROUP_SCHEME).map(|m| m.as_str().to_owned());
    uri.authority = caps.get(GROUP_AUTHORITY).map(|m| m.as_str().to_owned());
    uri.path = caps
        .get(GROUP_PATH)
        .map_or_else(String::new, |m| m.as_str().to_owned());
    uri.query = caps.get(GROUP_QUERY).map(|m| m.as_str().to_owned());
    uri.fragment = caps.get(GROUP_FRAGMENT).map(|m| m.as_str().to_owned());
    uri
}
