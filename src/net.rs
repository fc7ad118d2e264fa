//! Name resolution contract.
//!
//! Canonicalization ends with a record whose authority is classified;
//! the downloader's next move is a DNS lookup to turn the host (or to
//! validate the IP literal) into connectable addresses. This module
//! holds the boundary types for that hand-off: [`ResolverQuery`]
//! describes one lookup, [`Resolved`] its outcome, and [`Resolve`] is
//! the seam a downloader implements over its DNS client of choice. The
//! crate itself performs no I/O.

use std::net::IpAddr;

use crate::error::Error;
use crate::uri::{AuthorityKind, Uri};

/// Address family constraint for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddrFamilyHint {
    /// No constraint; the resolver may return any family.
    #[default]
    Unspecified,
    /// IPv4 addresses only.
    V4,
    /// IPv6 addresses only.
    V6,
}

/// One name-resolution request, borrowed from a canonicalized [`Uri`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverQuery<'a> {
    /// Service name or port number to resolve for, when the URI carries
    /// an explicit port.
    pub service: Option<&'a str>,
    /// The host name or IP literal to look up.
    pub host_or_ip: &'a str,
    /// Address family constraint derived from the authority kind.
    pub family: AddrFamilyHint,
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Resolved addresses, in the resolver's preference order.
    pub addresses: Vec<IpAddr>,
    /// Canonical name of the host, when the resolver reports one.
    pub canonical_name: Option<String>,
}

/// A name resolver the downloader plugs in.
///
/// Implementations wrap whatever DNS client the embedding application
/// uses; the error type is theirs, since lookup failures are transport
/// concerns, not URI concerns.
pub trait Resolve {
    /// Lookup failure reported by the underlying client.
    type Error;

    /// Resolves one query into addresses.
    ///
    /// # Errors
    ///
    /// Whatever the underlying client reports for a failed lookup.
    fn resolve(&self, query: ResolverQuery<'_>) -> Result<Resolved, Self::Error>;
}

impl Uri {
    /// Derives the resolver query for this record.
    ///
    /// Requires a record that passed normalization: the authority must
    /// be classified and the `valid` flag still set. A reg-name host
    /// gets no family constraint; an IP literal constrains the lookup
    /// to its own family.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAuthority`] when the record is invalid, its
    /// authority is unclassified, or the field matching its kind is
    /// unset; [`Error::MissingScheme`] when no scheme (the default
    /// service name) is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use urinorm::net::AddrFamilyHint;
    /// use urinorm::{normalize, parser};
    ///
    /// let mut uri = parser::parse("http://192.168.1.100:8080/index.html");
    /// normalize::normalize(&mut uri)?;
    /// let query = uri.resolver_query()?;
    /// assert_eq!(query.host_or_ip, "192.168.1.100");
    /// assert_eq!(query.service, Some("8080"));
    /// assert_eq!(query.family, AddrFamilyHint::V4);
    /// # Ok::<_, urinorm::Error>(())
    /// ```
    pub fn resolver_query(&self) -> Result<ResolverQuery<'_>, Error> {
        if !self.valid {
            return Err(Error::InvalidAuthority);
        }
        let (host_or_ip, family) = match self.kind {
            AuthorityKind::RegName => (self.host.as_deref(), AddrFamilyHint::Unspecified),
            AuthorityKind::Ipv4 => (self.ip.as_deref(), AddrFamilyHint::V4),
            AuthorityKind::Ipv6 => (self.ip.as_deref(), AddrFamilyHint::V6),
            AuthorityKind::Unclassified => (None, AddrFamilyHint::Unspecified),
        };
        let Some(host_or_ip) = host_or_ip else {
            return Err(Error::InvalidAuthority);
        };
        if self.scheme.is_none() {
            return Err(Error::MissingScheme);
        }
        let service = match self.port.as_deref() {
            Some(port) => Some(port),
            None => self.scheme.as_deref(),
        };
        Ok(ResolverQuery {
            service,
            host_or_ip,
            family,
        })
    }
}
