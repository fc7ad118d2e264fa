//! Helpers for RFC 3986 character classes.

/// Checks if the given character matches the `sub-delims` rule.
pub(crate) fn is_sub_delim(c: char) -> bool {
    matches!(
        c,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

/// Checks if the given character matches the `unreserved` rule.
pub(crate) fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Checks if the given character is valid past the first position of a
/// `scheme` (`ALPHA / DIGIT / "+" / "-" / "."`).
pub(crate) fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

/// Checks if the given character matches the `pchar` rule, percent
/// triplets excluded (those are handled one triplet at a time).
pub(crate) fn is_pchar(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || matches!(c, ':' | '@')
}
