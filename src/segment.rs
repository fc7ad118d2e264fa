//! Path segment algebra and the `remove_dot_segments` algorithm.
//!
//! A path is treated as a sequence of `/`-delimited segments. The four
//! primitives here ([`next_segment`], [`shift`], [`pop_last`],
//! [`replace_prefix`]) are the moves of [RFC 3986 section 5.2.4]: peek at
//! the next segment, consume it from the input buffer, pop an
//! already-emitted segment from the output buffer, or replace the leading
//! dot segment with a bare `/`. All of them are no-ops on an empty path
//! and delimit segments by searching for `/`, never by index arithmetic.
//!
//! [RFC 3986 section 5.2.4]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.4

use memchr::{memchr, memrchr};

/// Returns the end (exclusive byte index) of the leading segment.
///
/// The leading segment runs from the start of the path up to and
/// including the first `/` at position 1 or later, or to the end of the
/// path if there is none. A `/` at position 0 belongs to the segment it
/// introduces.
fn leading_segment_end(path: &str) -> usize {
    if path.len() <= 1 {
        return path.len();
    }
    match memchr(b'/', &path.as_bytes()[1..]) {
        Some(pos) => pos + 2,
        None => path.len(),
    }
}

/// Returns the shortest prefix of `path` that forms one segment.
///
/// The returned slice is one of the dot-segment shapes (`"."`, `".."`,
/// `"./"`, `"../"`, `"/."`, `"/.."`, `"/./"`, `"/../"`) when the path
/// starts with one, and otherwise the first ordinary segment including
/// its leading `/` (if any) and trailing `/` (if any). Dot segments fall
/// out of the same rule because `.` and `..` contain no slashes of their
/// own; RFC 3986 section 5.2.4 examines them preferentially and so do
/// the callers of this function.
///
/// Returns `""` for an empty path.
#[must_use]
pub fn next_segment(path: &str) -> &str {
    &path[..leading_segment_end(path)]
}

/// Removes the leading segment from `path` and returns it.
///
/// The removed prefix stops *before* the `/` that terminates the
/// segment, so that slash remains the head of the remainder and is
/// re-examined as the lead of the next segment. `drop_offset` extra
/// bytes are dropped from the remainder on top of that; callers pass 1
/// when the segment is not `/`-terminated (consuming the final byte of
/// the path) and 0 otherwise.
///
/// An empty path is a no-op returning `""`.
pub fn shift(path: &mut String, drop_offset: usize) -> String {
    if path.is_empty() {
        return String::new();
    }
    let end = match memchr(b'/', &path.as_bytes()[1..]) {
        Some(pos) => pos + 1,
        None => path.len(),
    };
    let segment = path[..end].to_owned();
    let rest_start = end.saturating_add(drop_offset).min(path.len());
    path.replace_range(..rest_start, "");
    segment
}

/// Removes the final segment from an output buffer and returns it.
///
/// The removed segment is everything from the last `/` (inclusive) to
/// the end; if the buffer holds no `/` at all, the whole buffer is
/// removed. Used when `/..` is recognized: one already-emitted segment
/// is popped.
///
/// An empty buffer is a no-op returning `""`.
pub fn pop_last(out: &mut String) -> String {
    if out.is_empty() {
        return String::new();
    }
    match memrchr(b'/', out.as_bytes()) {
        Some(pos) => {
            let segment = out[pos..].to_owned();
            out.truncate(pos);
            segment
        }
        None => std::mem::take(out),
    }
}

/// Replaces the leading segment of `path` with a single `/`, returning
/// the replaced segment.
///
/// `"/./rest"` becomes `"/rest"` and `"/.."` becomes `"/"`; the callers
/// only apply this to paths whose leading segment is `/.` or `/..`.
///
/// An empty path is a no-op returning `""`.
pub fn replace_prefix(path: &mut String) -> String {
    if path.is_empty() {
        return String::new();
    }
    let segment = shift(path, 1);
    path.insert(0, '/');
    segment
}

/// Interprets and removes the special `.` and `..` segments from a path.
///
/// Implements [RFC 3986 section 5.2.4] with two string buffers: the
/// input is consumed segment by segment and ordinary segments move to
/// the output, while dot segments are dropped, rooted, or pop the
/// previously emitted segment. Applied to every path extracted from a
/// reference during reference transformation, relative or not.
///
/// A leading `../` or `./` consumes only the dot segment itself; the
/// following `/` stays in the input and roots the remainder, so a
/// relative path that climbs out of its base collapses onto `/`:
///
/// ```
/// use urinorm::segment::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
/// assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
/// assert_eq!(remove_dot_segments("../../mid/6"), "/mid/6");
/// ```
///
/// The function is idempotent, and the identity on paths free of dot
/// segments.
///
/// [RFC 3986 section 5.2.4]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.4
#[must_use]
pub fn remove_dot_segments(path: &str) -> String {
    let mut input = path.to_owned();
    let mut output = String::with_capacity(path.len());
    while !input.is_empty() {
        match next_segment(&input) {
            "../" | "./" => {
                shift(&mut input, 0);
            }
            "/./" | "/." => {
                replace_prefix(&mut input);
            }
            "/../" | "/.." => {
                replace_prefix(&mut input);
                pop_last(&mut output);
            }
            _ if input == "." || input == ".." => input.clear(),
            segment => {
                let drop_offset = usize::from(!segment.ends_with('/'));
                let segment = shift(&mut input, drop_offset);
                output.push_str(&segment);
            }
        }
    }
    output
}
