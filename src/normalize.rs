//! Per-component normalization.
//!
//! Syntax-based normalization per [RFC 3986 section 6.2.2]: case folding
//! of scheme and reg-name, uppercasing of percent-triplet hex digits,
//! digit checks for port and IPv4 literals, and reclassification plus
//! reconstruction of the authority from its subcomponents. The entry
//! point is [`normalize`], a fixed pipeline over a [`Uri`] record; the
//! per-field steps are also exported individually.
//!
//! Dot-segment removal is *not* part of this pipeline. It runs only
//! inside reference transformation ([`resolve::transform`]), matching
//! the behavior the crawler's queue keying relies on.
//!
//! # Partial mutation
//!
//! The pipeline short-circuits on the first error, but every step that
//! ran before it has already committed its own field. Callers must
//! check the returned error (or the record's `valid` flag, which any
//! pipeline failure clears), not assume an all-or-nothing transaction.
//!
//! [RFC 3986 section 6.2.2]: https://datatracker.ietf.org/doc/html/rfc3986#section-6.2.2
//! [`resolve::transform`]: crate::resolve::transform

use memchr::memchr;

use crate::error::{Error, Ipv4Error};
use crate::parser::char::{is_pchar, is_scheme_char, is_sub_delim, is_unreserved};
use crate::uri::{AuthorityKind, Uri};

/// Runs the full normalization pipeline over the record.
///
/// Step order is fixed: scheme, authority classification, reg-name host
/// (if classified as one), port (if present), IP literal (if classified
/// as one), authority resync, path character validation. The first
/// failing step's error is returned and the record's `valid` flag is
/// cleared; see the module docs about partial mutation.
///
/// # Errors
///
/// The first error of the failing step. All of them mean "do not
/// enqueue this URI", never "crash".
///
/// # Examples
///
/// ```
/// use urinorm::{normalize, parser};
///
/// let mut uri = parser::parse("hTTp://www.Example.com:8080/x");
/// normalize::normalize(&mut uri)?;
/// assert_eq!(uri.scheme.as_deref(), Some("http"));
/// assert_eq!(uri.host.as_deref(), Some("www.example.com"));
/// assert_eq!(uri.recompose(), "http://www.example.com:8080/x");
/// # Ok::<_, urinorm::Error>(())
/// ```
pub fn normalize(uri: &mut Uri) -> Result<(), Error> {
    let result = pipeline(uri);
    if result.is_err() {
        uri.valid = false;
    }
    result
}

/// The pipeline body; [`normalize`] wraps it to clear `valid` on error.
fn pipeline(uri: &mut Uri) -> Result<(), Error> {
    scheme(uri)?;
    authority(uri)?;
    if uri.kind == AuthorityKind::RegName {
        host(uri)?;
    }
    if uri.port.is_some() {
        port(uri)?;
    }
    match uri.kind {
        AuthorityKind::Ipv4 => ipv4(uri)?,
        AuthorityKind::Ipv6 => ipv6(uri)?,
        AuthorityKind::RegName | AuthorityKind::Unclassified => {}
    }
    sync_authority(uri)?;
    path(uri)?;
    Ok(())
}

/// Normalizes the scheme component: case-folds it to lowercase.
///
/// The scheme must be non-empty, start with an ASCII letter, and
/// continue with `ALPHA / DIGIT / "+" / "-" / "."` only.
///
/// # Errors
///
/// [`Error::MissingScheme`] if the scheme is absent or empty,
/// [`Error::InvalidScheme`] on a character violation. The component is
/// left untouched on error.
pub fn scheme(uri: &mut Uri) -> Result<(), Error> {
    let scheme = uri.scheme.as_deref().unwrap_or("");
    if scheme.is_empty() {
        return Err(Error::MissingScheme);
    }
    let mut chars = scheme.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidScheme);
    }
    if !chars.all(is_scheme_char) {
        return Err(Error::InvalidScheme);
    }
    uri.scheme = Some(scheme.to_ascii_lowercase());
    Ok(())
}

/// Normalizes one percent-encoded triplet: uppercases its hex digits.
///
/// # Errors
///
/// [`Error::InvalidPercentEncoding`] unless the input is exactly `%`
/// followed by two hex digits.
///
/// # Examples
///
/// ```
/// use urinorm::normalize;
///
/// assert_eq!(normalize::pct_triplet("%a0")?, "%A0");
/// assert_eq!(normalize::pct_triplet("%7E")?, "%7E");
/// assert!(normalize::pct_triplet("%g0").is_err());
/// # Ok::<_, urinorm::Error>(())
/// ```
pub fn pct_triplet(triplet: &str) -> Result<String, Error> {
    let bytes = triplet.as_bytes();
    match bytes {
        [b'%', hi, lo] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => Ok(format!(
            "%{}{}",
            hi.to_ascii_uppercase() as char,
            lo.to_ascii_uppercase() as char
        )),
        _ => Err(Error::InvalidPercentEncoding),
    }
}

/// Copies the percent triplet starting at `bytes[at]` into `out`,
/// uppercasing the hex digits. Returns the number of bytes consumed.
fn copy_pct_triplet(out: &mut String, bytes: &[u8], at: usize) -> Result<usize, Error> {
    match (bytes.get(at + 1), bytes.get(at + 2)) {
        (Some(&hi), Some(&lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
            out.push('%');
            out.push(hi.to_ascii_uppercase() as char);
            out.push(lo.to_ascii_uppercase() as char);
            Ok(3)
        }
        _ => Err(Error::InvalidPercentEncoding),
    }
}

/// Normalizes the reg-name host: folds letters to lowercase and
/// uppercases percent-triplet hex digits.
///
/// A host that is not set is left alone (the record then describes an
/// IP literal or has not been classified). Everything outside
/// `unreserved / pct-encoded / sub-delims` is rejected; userinfo is not
/// recognized, so an `@` in the authority fails here as well.
///
/// # Errors
///
/// [`Error::InvalidHostChar`] on a character violation,
/// [`Error::InvalidPercentEncoding`] on a malformed triplet. The
/// component is left untouched on error.
pub fn host(uri: &mut Uri) -> Result<(), Error> {
    let Some(host) = uri.host.as_deref() else {
        return Ok(());
    };
    let bytes = host.as_bytes();
    let mut out = String::with_capacity(host.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' {
            i += copy_pct_triplet(&mut out, bytes, i)?;
            continue;
        }
        let c = char::from(b);
        if !b.is_ascii() || !(is_sub_delim(c) || is_unreserved(c)) {
            return Err(Error::InvalidHostChar);
        }
        out.push(c.to_ascii_lowercase());
        i += 1;
    }
    uri.host = Some(out);
    Ok(())
}

/// Checks the port subcomponent: ASCII digits only.
///
/// # Errors
///
/// [`Error::InvalidPort`] if any character is not a digit. An absent
/// port is a no-op.
pub fn port(uri: &mut Uri) -> Result<(), Error> {
    let Some(port) = uri.port.as_deref() else {
        return Ok(());
    };
    if port.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(Error::InvalidPort)
    }
}

/// Validates an IPv4 literal against the `dec-octet` grammar.
///
/// Exactly four `.`-separated octets; one digit carries any value,
/// two digits must be at least 10 and three digits between 100 and 255,
/// so no octet has a leading zero or exceeds 255.
///
/// # Errors
///
/// [`Error::InvalidIpv4`] with the specific [`Ipv4Error`] sub-case, or
/// [`Error::InvalidAuthority`] when no literal is set at all.
///
/// [`Ipv4Error`]: crate::Ipv4Error
pub fn ipv4(uri: &mut Uri) -> Result<(), Error> {
    let Some(ip) = uri.ip.as_deref() else {
        return Err(Error::InvalidAuthority);
    };
    let mut count = 0usize;
    for octet in ip.split('.') {
        count += 1;
        if count > 4 {
            return Err(Error::InvalidIpv4(Ipv4Error::WrongSegmentCount));
        }
        if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidIpv4(Ipv4Error::NonDigit));
        }
        if octet.len() > 3 {
            return Err(Error::InvalidIpv4(Ipv4Error::OutOfRange));
        }
        let value: u32 = octet
            .parse()
            .map_err(|_| Error::InvalidIpv4(Ipv4Error::NonDigit))?;
        match octet.len() {
            2 if value < 10 => return Err(Error::InvalidIpv4(Ipv4Error::LeadingZero)),
            3 if value < 100 => return Err(Error::InvalidIpv4(Ipv4Error::LeadingZero)),
            3 if value > 255 => return Err(Error::InvalidIpv4(Ipv4Error::OutOfRange)),
            _ => {}
        }
    }
    if count != 4 {
        return Err(Error::InvalidIpv4(Ipv4Error::WrongSegmentCount));
    }
    Ok(())
}

/// Reports IPv6 literal normalization as unsupported.
///
/// The downloader does not implement IPv6 canonicalization; beyond the
/// bracket tracking done during classification, an IPv6 authority is an
/// explicit unsupported condition, never a silent success.
///
/// # Errors
///
/// Always [`Error::UnsupportedIpv6`].
pub fn ipv6(_uri: &mut Uri) -> Result<(), Error> {
    Err(Error::UnsupportedIpv6)
}

/// Classifies the authority and splits it into host-or-ip and port.
///
/// The first character decides the kind: an ASCII letter means a
/// reg-name (RFC 1035 requires reg-names to start with one), `[` opens
/// an IPv6 literal whose closing `]` sets `ipv6_closed`, and a digit
/// means an IPv4 literal. The remaining bytes are scanned once and
/// split at the last `:` outside the brackets; a `:` inside `[...]`
/// never splits. The host or ip field matching the kind is committed
/// together with the port, the other one is cleared.
///
/// # Errors
///
/// [`Error::InvalidAuthority`] when the authority is absent, empty, or
/// starts with a character matching no kind; these also clear the
/// record's `valid` flag immediately.
pub fn authority(uri: &mut Uri) -> Result<(), Error> {
    uri.kind = AuthorityKind::Unclassified;
    uri.ipv6_closed = false;
    let Some(auth) = uri.authority.as_deref() else {
        uri.valid = false;
        return Err(Error::InvalidAuthority);
    };

    let kind = match auth.bytes().next() {
        Some(b) if b.is_ascii_alphabetic() => AuthorityKind::RegName,
        Some(b'[') => AuthorityKind::Ipv6,
        Some(b) if b.is_ascii_digit() => AuthorityKind::Ipv4,
        _ => {
            uri.valid = false;
            return Err(Error::InvalidAuthority);
        }
    };

    let (host_or_ip, port, closed) = if kind == AuthorityKind::Ipv6 {
        let body = &auth[1..];
        match memchr(b']', body.as_bytes()) {
            Some(end) => {
                let after = &body[end + 1..];
                let port = after.strip_prefix(':').map(str::to_owned);
                (body[..end].to_owned(), port, true)
            }
            // Unclosed literal: RFC 2732 mandates rejection, which the
            // IP normalization step delivers via `ipv6_closed = false`.
            None => (body.to_owned(), None, false),
        }
    } else {
        match auth.rfind(':') {
            Some(at) => (auth[..at].to_owned(), Some(auth[at + 1..].to_owned()), false),
            None => (auth.to_owned(), None, false),
        }
    };

    uri.kind = kind;
    uri.ipv6_closed = closed;
    uri.port = port;
    if kind == AuthorityKind::RegName {
        uri.host = Some(host_or_ip);
        uri.ip = None;
    } else {
        uri.ip = Some(host_or_ip);
        uri.host = None;
    }
    Ok(())
}

/// Rebuilds the authority from host/ip, kind, and port.
///
/// Run after the per-subcomponent steps so the stored authority string
/// reflects their results; recomposition emits the authority as stored
/// and never re-derives it. An IPv6 literal is re-bracketed.
///
/// # Errors
///
/// [`Error::InvalidAuthority`] if neither host nor ip is set for the
/// classified kind.
pub fn sync_authority(uri: &mut Uri) -> Result<(), Error> {
    let host_or_ip = match uri.kind {
        AuthorityKind::RegName => uri.host.as_deref(),
        AuthorityKind::Ipv4 | AuthorityKind::Ipv6 => uri.ip.as_deref(),
        AuthorityKind::Unclassified => None,
    };
    let Some(host_or_ip) = host_or_ip else {
        return Err(Error::InvalidAuthority);
    };
    let mut auth = if uri.kind == AuthorityKind::Ipv6 {
        format!("[{host_or_ip}]")
    } else {
        host_or_ip.to_owned()
    };
    if let Some(port) = uri.port.as_deref() {
        auth.push(':');
        auth.push_str(port);
    }
    uri.authority = Some(auth);
    Ok(())
}

/// Validates and normalizes the path characters.
///
/// Every character must be a `pchar` or `/`; percent triplets are
/// normalized to uppercase hex digits. Dot segments are left alone
/// here (see the module docs).
///
/// # Errors
///
/// [`Error::InvalidPath`] on a character violation,
/// [`Error::InvalidPercentEncoding`] on a malformed triplet. The
/// component is left untouched on error.
pub fn path(uri: &mut Uri) -> Result<(), Error> {
    let bytes = uri.path.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' {
            i += copy_pct_triplet(&mut out, bytes, i)?;
            continue;
        }
        let c = char::from(b);
        if !b.is_ascii() || !(is_pchar(c) || c == '/') {
            return Err(Error::InvalidPath);
        }
        out.push(c);
        i += 1;
    }
    uri.path = out;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn scheme_folds_case() {
        let mut uri = parse("hTTp://www.example.com/test/func.cgi?x=y&z=j");
        scheme(&mut uri).expect("valid scheme");
        assert_eq!(uri.scheme.as_deref(), Some("http"));
    }

    #[test]
    fn scheme_missing_or_invalid() {
        let mut uri = parse("/relative/only");
        assert_eq!(scheme(&mut uri), Err(Error::MissingScheme));

        let mut uri = parse("relative:path");
        uri.scheme = Some("9http".to_owned());
        assert_eq!(scheme(&mut uri), Err(Error::InvalidScheme));
        assert_eq!(uri.scheme.as_deref(), Some("9http"), "left untouched");

        uri.scheme = Some("ht tp".to_owned());
        assert_eq!(scheme(&mut uri), Err(Error::InvalidScheme));
    }

    #[test]
    fn pct_triplet_cases() {
        assert_eq!(pct_triplet("%00").as_deref(), Ok("%00"));
        assert_eq!(pct_triplet("%A0").as_deref(), Ok("%A0"));
        assert_eq!(pct_triplet("%a0").as_deref(), Ok("%A0"));
        assert_eq!(pct_triplet("%0"), Err(Error::InvalidPercentEncoding));
        assert_eq!(pct_triplet("%zz"), Err(Error::InvalidPercentEncoding));
        assert_eq!(pct_triplet("a%0"), Err(Error::InvalidPercentEncoding));
    }

    #[test]
    fn host_folds_case_and_triplets() {
        let mut uri = parse("http://www.example.com/");
        uri.host = Some("www.eXamPle.com%20%20".to_owned());
        host(&mut uri).expect("valid host");
        assert_eq!(uri.host.as_deref(), Some("www.example.com%20%20"));
    }

    #[test]
    fn host_rejects_control_characters() {
        let mut uri = parse("http://www.example.com/");
        uri.host = Some("www.\teXamPle.com%20%20".to_owned());
        assert_eq!(host(&mut uri), Err(Error::InvalidHostChar));
        assert_eq!(
            uri.host.as_deref(),
            Some("www.\teXamPle.com%20%20"),
            "left untouched"
        );
    }

    #[test]
    fn host_rejects_truncated_triplet() {
        let mut uri = parse("http://www.example.com/");
        uri.host = Some("www.example.com%2".to_owned());
        assert_eq!(host(&mut uri), Err(Error::InvalidPercentEncoding));
    }

    #[test]
    fn host_absent_is_noop() {
        let mut uri = parse("http://www.example.com/");
        assert_eq!(uri.host, None);
        host(&mut uri).expect("no-op");
    }

    #[test]
    fn port_digits_only() {
        let mut uri = parse("http://www.example.com:8080/");
        authority(&mut uri).expect("classifiable");
        port(&mut uri).expect("numeric port");

        uri.port = Some("80a0".to_owned());
        assert_eq!(port(&mut uri), Err(Error::InvalidPort));
    }

    #[test]
    fn ipv4_accepts_valid_literals() {
        let mut uri = parse("http://192.168.1.1/");
        uri.ip = Some("192.168.1.1".to_owned());
        ipv4(&mut uri).expect("valid literal");

        uri.ip = Some("0.0.0.0".to_owned());
        ipv4(&mut uri).expect("valid literal");

        uri.ip = Some("255.255.255.255".to_owned());
        ipv4(&mut uri).expect("valid literal");
    }

    #[test]
    fn ipv4_rejects_bad_literals() {
        let mut uri = parse("http://192.168.1.1/");

        uri.ip = Some("192.168.01.1".to_owned());
        assert_eq!(ipv4(&mut uri), Err(Error::InvalidIpv4(Ipv4Error::LeadingZero)));

        uri.ip = Some("192.368.1.1".to_owned());
        assert_eq!(ipv4(&mut uri), Err(Error::InvalidIpv4(Ipv4Error::OutOfRange)));

        uri.ip = Some("192.168.1".to_owned());
        assert_eq!(
            ipv4(&mut uri),
            Err(Error::InvalidIpv4(Ipv4Error::WrongSegmentCount))
        );

        uri.ip = Some("192.168.1.1.5".to_owned());
        assert_eq!(
            ipv4(&mut uri),
            Err(Error::InvalidIpv4(Ipv4Error::WrongSegmentCount))
        );

        uri.ip = Some("192.168..1".to_owned());
        assert_eq!(ipv4(&mut uri), Err(Error::InvalidIpv4(Ipv4Error::NonDigit)));

        uri.ip = Some("192.16a.1.1".to_owned());
        assert_eq!(ipv4(&mut uri), Err(Error::InvalidIpv4(Ipv4Error::NonDigit)));

        uri.ip = Some("1924.1.1.1".to_owned());
        assert_eq!(ipv4(&mut uri), Err(Error::InvalidIpv4(Ipv4Error::OutOfRange)));

        uri.ip = None;
        assert_eq!(ipv4(&mut uri), Err(Error::InvalidAuthority));
    }

    #[test]
    fn classify_reg_name() {
        let mut uri = parse("http://www.example.com/test/func.cgi?x=y&z=j");
        authority(&mut uri).expect("classifiable");
        assert_eq!(uri.kind, AuthorityKind::RegName);
        assert_eq!(uri.host.as_deref(), Some("www.example.com"));
        assert_eq!(uri.ip, None);
        assert_eq!(uri.port, None);
    }

    #[test]
    fn classify_reg_name_with_port() {
        let mut uri = parse("http://www.example.com:8080/test/func.cgi");
        authority(&mut uri).expect("classifiable");
        assert_eq!(uri.host.as_deref(), Some("www.example.com"));
        assert_eq!(uri.port.as_deref(), Some("8080"));
    }

    #[test]
    fn classify_ipv4_with_port() {
        let mut uri = parse("http://192.168.1.100:8080/test/func.cgi");
        authority(&mut uri).expect("classifiable");
        assert_eq!(uri.kind, AuthorityKind::Ipv4);
        assert_eq!(uri.ip.as_deref(), Some("192.168.1.100"));
        assert_eq!(uri.host, None);
        assert_eq!(uri.port.as_deref(), Some("8080"));
    }

    #[test]
    fn classify_ipv6_bracket_tracking() {
        let mut uri = parse("http://[::1]:8080/x");
        authority(&mut uri).expect("classifiable");
        assert_eq!(uri.kind, AuthorityKind::Ipv6);
        assert!(uri.ipv6_closed);
        assert_eq!(uri.ip.as_deref(), Some("::1"));
        assert_eq!(uri.port.as_deref(), Some("8080"));

        let mut uri = parse("http://[::1/x");
        authority(&mut uri).expect("classification itself succeeds");
        assert_eq!(uri.kind, AuthorityKind::Ipv6);
        assert!(!uri.ipv6_closed);
        assert_eq!(uri.ip.as_deref(), Some("::1"));
        assert_eq!(uri.port, None);
    }

    #[test]
    fn classify_rejects_absent_or_unrecognized() {
        let mut uri = parse("path/only");
        assert_eq!(authority(&mut uri), Err(Error::InvalidAuthority));
        assert!(!uri.valid);

        let mut uri = parse("http://-dash.example.com/");
        assert_eq!(authority(&mut uri), Err(Error::InvalidAuthority));
        assert!(!uri.valid);

        let mut uri = parse("foo:///");
        assert_eq!(uri.authority.as_deref(), Some(""));
        assert_eq!(authority(&mut uri), Err(Error::InvalidAuthority));
    }

    #[test]
    fn sync_rebuilds_authority() {
        let mut uri = parse("http://www.example.com:8080/x");
        authority(&mut uri).expect("classifiable");
        uri.host = Some("www.other.org".to_owned());
        sync_authority(&mut uri).expect("host is set");
        assert_eq!(uri.authority.as_deref(), Some("www.other.org:8080"));
    }

    #[test]
    fn sync_brackets_ipv6() {
        let mut uri = parse("http://[::1]:8080/x");
        authority(&mut uri).expect("classifiable");
        sync_authority(&mut uri).expect("ip is set");
        assert_eq!(uri.authority.as_deref(), Some("[::1]:8080"));
    }

    #[test]
    fn sync_requires_host_or_ip() {
        let mut uri = parse("http://www.example.com/x");
        assert_eq!(uri.kind, AuthorityKind::Unclassified);
        assert_eq!(sync_authority(&mut uri), Err(Error::InvalidAuthority));
    }

    #[test]
    fn path_normalizes_triplets() {
        let mut uri = parse("http://h/a%2fb/c");
        path(&mut uri).expect("valid path");
        assert_eq!(uri.path, "/a%2Fb/c");
    }

    #[test]
    fn path_rejects_bad_characters() {
        let mut uri = parse("http://h/a b");
        assert_eq!(path(&mut uri), Err(Error::InvalidPath));
        assert_eq!(uri.path, "/a b", "left untouched");

        let mut uri = parse("http://h/a%2zb");
        assert_eq!(path(&mut uri), Err(Error::InvalidPercentEncoding));
    }

    #[test]
    fn pipeline_success_regname() {
        let mut uri = parse("http://www.example.com/test/func.cgi?x=y&z=j");
        normalize(&mut uri).expect("canonical input");
        assert_eq!(uri.host.as_deref(), Some("www.example.com"));
        assert!(uri.valid);
    }

    #[test]
    fn pipeline_success_ipv4() {
        let mut uri = parse("http://192.168.1.100:8080/test/func.cgi?x=y&z=j");
        normalize(&mut uri).expect("canonical input");
        assert_eq!(uri.ip.as_deref(), Some("192.168.1.100"));
        assert!(uri.valid);
    }

    #[test]
    fn pipeline_failure_clears_valid_and_keeps_committed_steps() {
        let mut uri = parse("HTTP://192.168.01.1/x");
        let err = normalize(&mut uri).expect_err("octet has a leading zero");
        assert_eq!(err, Error::InvalidIpv4(Ipv4Error::LeadingZero));
        assert!(!uri.valid);
        // Steps before the failing one committed their fields.
        assert_eq!(uri.scheme.as_deref(), Some("http"));
        assert_eq!(uri.kind, AuthorityKind::Ipv4);
        assert_eq!(uri.ip.as_deref(), Some("192.168.01.1"));
    }

    #[test]
    fn pipeline_reports_ipv6_unsupported() {
        let mut uri = parse("http://[::1]:8080/x");
        assert_eq!(normalize(&mut uri), Err(Error::UnsupportedIpv6));
        assert!(!uri.valid);
        assert!(uri.ipv6_closed);
    }

    #[test]
    fn pipeline_does_not_remove_dot_segments() {
        let mut uri = parse("http://www.example.com/a/../b");
        normalize(&mut uri).expect("valid characters");
        assert_eq!(uri.path, "/a/../b");
    }
}
