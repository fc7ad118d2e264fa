//! Normalization and resolution errors.

use thiserror::Error;

/// Error on URI component normalization or resolution.
///
/// Every variant is an ordinary, recoverable outcome: a crawler receiving
/// one should mark the candidate URI as non-enqueueable and continue.
/// The failing [`Uri`] is also flagged via its `valid` field, so callers
/// holding the partially normalized record can tell it must not be
/// treated as resolvable.
///
/// [`Uri`]: crate::Uri
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The scheme component is absent or empty.
    ///
    /// A URI cannot be normalized (or resolved against the network)
    /// without a scheme; relative references gain one through reference
    /// transformation first.
    #[error("scheme component is missing")]
    MissingScheme,
    /// The scheme does not match `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
    #[error("invalid character in scheme")]
    InvalidScheme,
    /// A percent-encoded triplet is not `%` followed by two hex digits.
    #[error("malformed percent-encoded triplet")]
    InvalidPercentEncoding,
    /// A registered name contains a character outside
    /// `unreserved / pct-encoded / sub-delims`.
    #[error("invalid character in registered name")]
    InvalidHostChar,
    /// The port subcomponent contains a non-digit character.
    #[error("invalid character in port")]
    InvalidPort,
    /// The authority component is absent, empty, or starts with a
    /// character that matches no authority kind.
    #[error("invalid authority component")]
    InvalidAuthority,
    /// An IPv4 literal violates the `dec-octet` grammar of
    /// [RFC 3986 section 3.2.2].
    ///
    /// [RFC 3986 section 3.2.2]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
    #[error("invalid IPv4 literal: {0}")]
    InvalidIpv4(Ipv4Error),
    /// The authority holds an IPv6 literal, whose normalization is
    /// unimplemented.
    ///
    /// Reported instead of silently accepting (or crashing on) a literal
    /// this crate cannot canonicalize.
    #[error("IPv6 literal normalization is not supported")]
    UnsupportedIpv6,
    /// The path contains a character outside `pchar / "/"`.
    #[error("invalid character in path")]
    InvalidPath,
}

/// Detailed cause of an [`Error::InvalidIpv4`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ipv4Error {
    /// A multi-digit octet starts with `0` (e.g. `01`, `099`).
    #[error("leading zero in octet")]
    LeadingZero,
    /// An octet value exceeds 255, or an octet is longer than 3 digits.
    #[error("octet out of range")]
    OutOfRange,
    /// The literal does not consist of exactly four octets.
    #[error("expected exactly four octets")]
    WrongSegmentCount,
    /// An octet contains a non-digit character or no digits at all.
    #[error("non-digit in octet")]
    NonDigit,
}
