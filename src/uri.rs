//! The parsed-URI record.

use core::fmt;
use std::time::SystemTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification of the authority component's host subcomponent.
///
/// A closed set: a host is a registered name, an IPv4 literal, or an
/// IPv6 literal, never several at once. Impossible combinations the
/// source of truth for this crate used to express with independent bit
/// flags are unrepresentable here by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AuthorityKind {
    /// Not yet classified by [`normalize::authority`].
    ///
    /// [`normalize::authority`]: crate::normalize::authority
    #[default]
    Unclassified,
    /// DNS-style registered name (`host` field is set).
    RegName,
    /// IPv4 literal address (`ip` field is set).
    Ipv4,
    /// IPv6 literal address (`ip` field holds the bracket-free literal).
    Ipv6,
}

/// One parsed, possibly normalized URI.
///
/// Created empty by [`parser::parse`] or synthesized by
/// [`resolve::transform`]; mutated in place only by the normalization
/// steps in [`normalize`]. Optional components distinguish "absent"
/// (`None`) from "present but empty" (`Some(String::new())`); both are
/// observable grammar states and recompose differently.
///
/// # Invariants
///
/// * `kind` is [`RegName`] or [`Ipv4`] ⇒ exactly one of `host`/`ip` is
///   set, matching the kind.
/// * `kind` is [`Ipv6`] ⇒ `ip` holds the bracket-free literal, and
///   `ipv6_closed` must be true for the record to be `valid`.
/// * while `valid` is true, every `%` in `host` and `path` begins a
///   well-formed triplet (`%` plus two hex digits).
/// * after normalization, triplet hex digits are uppercase; scheme and
///   reg-name host are lowercase.
/// * `path` never begins with `//` unless `authority` is absent.
///
/// [`RegName`]: AuthorityKind::RegName
/// [`Ipv4`]: AuthorityKind::Ipv4
/// [`Ipv6`]: AuthorityKind::Ipv6
/// [`parser::parse`]: crate::parser::parse
/// [`resolve::transform`]: crate::resolve::transform
/// [`normalize`]: crate::normalize
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Uri {
    /// Scheme component, without the trailing `:`.
    ///
    /// Present only if a scheme was syntactically matched.
    pub scheme: Option<String>,
    /// Authority component, without the leading `//`.
    ///
    /// Present only if `//` was matched. Note that this can be
    /// `Some("")`.
    pub authority: Option<String>,
    /// Path component. Always present per the grammar, possibly empty.
    pub path: String,
    /// Query component, without the leading `?`.
    pub query: Option<String>,
    /// Fragment component, without the leading `#`.
    pub fragment: Option<String>,
    /// Host subcomponent in reg-name form.
    ///
    /// Set only when `kind` is [`AuthorityKind::RegName`].
    pub host: Option<String>,
    /// Host subcomponent in literal-address form.
    ///
    /// Set only when `kind` is [`AuthorityKind::Ipv4`] or
    /// [`AuthorityKind::Ipv6`]; for IPv6 the brackets are stripped.
    pub ip: Option<String>,
    /// Port subcomponent, a string of ASCII digits.
    pub port: Option<String>,
    /// Authority classification.
    pub kind: AuthorityKind,
    /// False once any normalization step detected a syntax violation.
    ///
    /// Once false, the record must not be treated as resolvable.
    pub valid: bool,
    /// True once an IPv6 literal's closing `]` has been seen.
    ///
    /// Only meaningful when `kind` is [`AuthorityKind::Ipv6`].
    pub ipv6_closed: bool,
    /// Database identifier, carried opaquely for the storage layer.
    pub id: Option<i64>,
    /// Last-modified time, carried opaquely for the storage layer.
    pub modified: Option<SystemTime>,
}

impl Uri {
    /// Creates an empty, valid, unclassified record.
    ///
    /// This is the state [`parser::parse`] and [`resolve::transform`]
    /// start from.
    ///
    /// [`parser::parse`]: crate::parser::parse
    /// [`resolve::transform`]: crate::resolve::transform
    #[must_use]
    pub fn new() -> Self {
        Self {
            valid: true,
            ..Self::default()
        }
    }

    /// Recomposes the components into a URI string.
    ///
    /// See [RFC 3986 section 5.3]. An absent component contributes
    /// nothing, not even its delimiter; the authority is emitted as
    /// stored, so callers wanting host/ip/port reflected must run
    /// [`normalize::sync_authority`] (part of the normalization
    /// pipeline) first.
    ///
    /// # Examples
    ///
    /// ```
    /// use urinorm::parser;
    ///
    /// let uri = parser::parse("http://www.example.com/test/func.cgi?x=y&z=j");
    /// assert_eq!(uri.recompose(), "http://www.example.com/test/func.cgi?x=y&z=j");
    /// ```
    ///
    /// [RFC 3986 section 5.3]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.3
    /// [`normalize::sync_authority`]: crate::normalize::sync_authority
    #[inline]
    #[must_use]
    pub fn recompose(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}
