//! Reference resolution.
//!
//! A crawler extracts hrefs from a page and must turn each one into an
//! absolute target URI before it can be canonicalized and enqueued.
//! [`transform`] is the transform-references algorithm of
//! [RFC 3986 section 5.2.2]; [`merge_paths`] is the path merge of
//! [section 5.2.3], used only by the transformation;
//! [`resolve_reference`] is the one-shot parse → transform → normalize
//! helper the downloader calls per extracted href.
//!
//! [RFC 3986 section 5.2.2]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.2
//! [section 5.2.3]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.3

use crate::error::Error;
use crate::normalize;
use crate::parser;
use crate::segment::{self, remove_dot_segments};
use crate::uri::Uri;

/// Merges a base path with a relative reference path.
///
/// If the base has a defined authority and an empty path, the result is
/// `/` followed by the reference's path. Otherwise the reference's path
/// is appended to all but the last segment of the base's path (i.e.
/// everything up to the right-most `/`, or nothing if the base path has
/// no `/` at all).
///
/// Dot segments are *not* removed here; the caller applies
/// [`remove_dot_segments`] to the merged result.
///
/// # Examples
///
/// ```
/// use urinorm::{parser, resolve};
///
/// let base = parser::parse("http://www.example.com/a/path/to/uri");
/// let rel = parser::parse("path/to/uri");
/// assert_eq!(resolve::merge_paths(&base, &rel), "/a/path/to/path/to/uri");
/// ```
#[must_use]
pub fn merge_paths(base: &Uri, rel: &Uri) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        format!("/{}", rel.path)
    } else {
        let mut merged = base.path.clone();
        segment::pop_last(&mut merged);
        merged.push('/');
        merged.push_str(&rel.path);
        merged
    }
}

/// Transforms a reference URI into its target against a base URI.
///
/// Implements the [RFC 3986 section 5.2.2] decision tree, including the
/// backward-compatibility relaxation: with `strict` false, a reference
/// scheme equal to the base scheme (absent compared as empty) is treated
/// as absent for the rest of the call. The suppression acts on a local
/// view only; the caller's `reference` is never mutated.
///
/// Returns a freshly constructed record; `base` and `reference` are
/// read-only. The target's host/ip/port are unclassified until the
/// normalization pipeline runs.
///
/// # Examples
///
/// ```
/// use urinorm::{parser, resolve};
///
/// let base = parser::parse("http://www.example.com");
/// let reference = parser::parse("../path/to/uri.html");
/// let target = resolve::transform(&base, &reference, true);
/// assert_eq!(target.scheme.as_deref(), Some("http"));
/// assert_eq!(target.authority.as_deref(), Some("www.example.com"));
/// assert_eq!(target.path, "/path/to/uri.html");
/// ```
///
/// [RFC 3986 section 5.2.2]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.2
#[must_use]
pub fn transform(base: &Uri, reference: &Uri, strict: bool) -> Uri {
    let mut target = Uri::new();

    // Scheme suppression for the non-strict (backward compatible) mode.
    let same_scheme =
        reference.scheme.as_deref().unwrap_or("") == base.scheme.as_deref().unwrap_or("");
    let ref_scheme = if !strict && same_scheme {
        None
    } else {
        reference.scheme.as_deref()
    };

    if let Some(scheme) = ref_scheme {
        target.scheme = Some(scheme.to_owned());
        target.authority = reference.authority.clone();
        target.path = remove_dot_segments(&reference.path);
        target.query = reference.query.clone();
    } else if reference.authority.is_some() {
        target.authority = reference.authority.clone();
        target.path = remove_dot_segments(&reference.path);
        target.query = reference.query.clone();
        target.scheme = base.scheme.clone();
    } else {
        if reference.path.is_empty() {
            target.path = base.path.clone();
            target.query = if reference.query.is_some() {
                reference.query.clone()
            } else {
                base.query.clone()
            };
        } else {
            if reference.path.starts_with('/') {
                target.path = remove_dot_segments(&reference.path);
            } else {
                target.path = remove_dot_segments(&merge_paths(base, reference));
            }
            target.query = reference.query.clone();
        }
        target.authority = base.authority.clone();
        target.scheme = base.scheme.clone();
    }
    target.fragment = reference.fragment.clone();
    target
}

/// Resolves and canonicalizes one extracted href against a base URI.
///
/// Parses `href`, transforms it against `base`, and runs the full
/// normalization pipeline on the target. This is the downloader's entry
/// point for every link found in a page.
///
/// # Errors
///
/// Returns the first normalization error of the target. That is an
/// ordinary outcome meaning the candidate must not be enqueued for
/// download; the caller continues with the next href.
///
/// # Examples
///
/// ```
/// use urinorm::{parser, resolve};
///
/// let base = parser::parse("http://www.example.com/docs/index.html");
/// let target = resolve::resolve_reference(&base, "../img/logo.gif", true)?;
/// assert_eq!(target.recompose(), "http://www.example.com/img/logo.gif");
/// # Ok::<_, urinorm::Error>(())
/// ```
pub fn resolve_reference(base: &Uri, href: &str, strict: bool) -> Result<Uri, Error> {
    let reference = parser::parse(href);
    let mut target = transform(base, &reference, strict);
    normalize::normalize(&mut target)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_with_authority_and_empty_base_path() {
        let base = parser::parse("http://www.example.com");
        let rel = parser::parse("path/to/uri");
        assert_eq!(merge_paths(&base, &rel), "/path/to/uri");
    }

    #[test]
    fn merge_drops_last_base_segment() {
        let base = parser::parse("http://www.example.com/a/path/to/uri");
        let rel = parser::parse("path/to/uri");
        assert_eq!(merge_paths(&base, &rel), "/a/path/to/path/to/uri");
    }

    #[test]
    fn transform_keeps_reference_scheme() {
        let base = parser::parse("http://www.example.com");
        let reference = parser::parse("http://www.new.com/../path/to/uri.html");
        let target = transform(&base, &reference, true);
        assert_eq!(target.scheme.as_deref(), Some("http"));
        assert_eq!(target.authority.as_deref(), Some("www.new.com"));
        assert_eq!(target.path, "/path/to/uri.html");
    }

    #[test]
    fn transform_climbing_reference() {
        let base = parser::parse("http://www.example.com/this/is/a/buf/old/path");
        let reference = parser::parse("../../new/path/uri.html");
        let target = transform(&base, &reference, true);
        assert_eq!(target.path, "/this/is/a/new/path/uri.html");
    }

    #[test]
    fn transform_empty_reference_path_takes_base_query() {
        let base = parser::parse("http://www.example.com/p?base-query");
        let reference = parser::parse("#frag");
        let target = transform(&base, &reference, true);
        assert_eq!(target.path, "/p");
        assert_eq!(target.query.as_deref(), Some("base-query"));
        assert_eq!(target.fragment.as_deref(), Some("frag"));
    }

    #[test]
    fn transform_empty_reference_path_prefers_reference_query() {
        let base = parser::parse("http://www.example.com/p?base-query");
        let reference = parser::parse("?ref-query");
        let target = transform(&base, &reference, true);
        assert_eq!(target.path, "/p");
        assert_eq!(target.query.as_deref(), Some("ref-query"));
    }

    #[test]
    fn non_strict_suppresses_matching_scheme() {
        let base = parser::parse("http://www.example.com/a/b");
        let reference = parser::parse("http:c/d");
        let target = transform(&base, &reference, false);
        // The reference scheme matches the base, so the reference is
        // treated as relative: its path merges with the base path.
        assert_eq!(target.authority.as_deref(), Some("www.example.com"));
        assert_eq!(target.path, "/a/c/d");
    }

    #[test]
    fn non_strict_does_not_mutate_the_reference() {
        let base = parser::parse("http://www.example.com/a/b");
        let reference = parser::parse("http:c/d");
        let _ = transform(&base, &reference, false);
        assert_eq!(reference.scheme.as_deref(), Some("http"));
    }

    #[test]
    fn strict_keeps_matching_scheme() {
        let base = parser::parse("http://www.example.com/a/b");
        let reference = parser::parse("http:c/d");
        let target = transform(&base, &reference, true);
        assert_eq!(target.authority, None);
        assert_eq!(target.path, "c/d");
    }
}
