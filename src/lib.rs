//! URI canonicalization for a web crawler, built on [RFC 3986].
//!
//! A crawler that discovers the same resource through syntactically
//! different links (`hTTp://Example.COM/a/../b`, `http://example.com/b`)
//! must collapse them to one canonical string before queue admission and
//! de-duplication. This crate provides the component set for that job:
//!
//! * [`parser::parse`] splits a raw string into the five generic-syntax
//!   components (scheme, authority, path, query, fragment) using the
//!   fixed pattern of RFC 3986 Appendix B.
//! * [`resolve::transform`] implements the reference transformation of
//!   [RFC 3986 section 5.2.2], turning a (possibly relative) reference
//!   plus a base URI into an absolute target, with
//!   [`segment::remove_dot_segments`] and [`resolve::merge_paths`]
//!   covering sections 5.2.4 and 5.2.3.
//! * [`normalize::normalize`] runs the per-component normalization
//!   pipeline (scheme case, percent-encoding case, reg-name case, port
//!   digits, IPv4 literal validity, authority classification and resync).
//! * [`Uri`]'s `Display` implementation recomposes the record into the
//!   canonical string per [RFC 3986 section 5.3].
//!
//! The one-shot crawler entry point is [`resolve::resolve_reference`]:
//! parse an extracted href, transform it against the page's base URI, and
//! normalize the target. A failure means the candidate is not
//! enqueueable; it is an ordinary outcome, never a process error.
//!
//! ```
//! use urinorm::{parser, resolve};
//!
//! let base = parser::parse("http://www.example.com/a/index.html");
//! let target = resolve::resolve_reference(&base, "../b/page.html?q=1", true)?;
//! assert_eq!(target.recompose(), "http://www.example.com/b/page.html?q=1");
//! # Ok::<_, urinorm::Error>(())
//! ```
//!
//! # Absent is not empty
//!
//! Every optional component is an `Option<String>`, and `None` is
//! observably different from `Some("")`: `foo://` has an *empty*
//! authority while `foo:` has *no* authority, and the two recompose
//! differently. The same distinction drives the reference transformation
//! decision tree.
//!
//! # Scope
//!
//! Host names are treated as opaque ASCII reg-names; Unicode/IDNA host
//! mapping, URI template expansion, and query-string semantics are out of
//! scope. IPv6 literals are recognized and bracket-tracked but their
//! normalization is unimplemented and reported as
//! [`Error::UnsupportedIpv6`]. Network resolution is modeled only at its
//! interface boundary in [`net`].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986
//! [RFC 3986 section 5.2.2]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2.2
//! [RFC 3986 section 5.3]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.3
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

mod error;
pub mod net;
pub mod normalize;
pub mod parser;
pub mod resolve;
pub mod segment;
mod uri;

pub use self::error::{Error, Ipv4Error};
pub use self::uri::{AuthorityKind, Uri};
