//! Reference resolution against a base URI, through the public API.

use urinorm::parser::parse;
use urinorm::{resolve, Error};

#[test]
fn relative_href_against_site_root() {
    let base = parse("http://www.example.com");
    let reference = parse("../path/to/uri.html?query&e=b");
    let target = resolve::transform(&base, &reference, true);
    assert_eq!(target.scheme.as_deref(), Some("http"));
    assert_eq!(target.authority.as_deref(), Some("www.example.com"));
    assert_eq!(target.path, "/path/to/uri.html");
    assert_eq!(target.query.as_deref(), Some("query&e=b"));
    assert_eq!(
        target.recompose(),
        "http://www.example.com/path/to/uri.html?query&e=b"
    );
}

#[test]
fn climbing_href_against_deep_base() {
    let base = parse("http://www.example.com/this/is/a/buf/old/path?q=x");
    let reference = parse("../../new/path/uri.html");
    let target = resolve::transform(&base, &reference, true);
    assert_eq!(target.path, "/this/is/a/new/path/uri.html");
    assert_eq!(target.query, None);
}

#[test]
fn absolute_path_href_replaces_base_path() {
    let base = parse("http://www.example.com/a/b/c?q");
    let reference = parse("/x/./y/../z");
    let target = resolve::transform(&base, &reference, true);
    assert_eq!(target.authority.as_deref(), Some("www.example.com"));
    assert_eq!(target.path, "/x/z");
}

#[test]
fn absolute_href_ignores_base() {
    let base = parse("http://www.example.com/a/b");
    let reference = parse("https://other.org/p?q#f");
    let target = resolve::transform(&base, &reference, true);
    assert_eq!(target.recompose(), "https://other.org/p?q#f");
}

#[test]
fn fragment_only_href_keeps_base_path_and_query() {
    let base = parse("http://www.example.com/p?base");
    let reference = parse("#section-2");
    let target = resolve::transform(&base, &reference, true);
    assert_eq!(target.recompose(), "http://www.example.com/p?base#section-2");
}

#[test]
fn resolve_reference_normalizes_the_target() {
    let base = parse("http://www.example.com/docs/index.html");
    let target =
        resolve::resolve_reference(&base, "../IMG/logo.gif", true).expect("resolvable href");
    // Path case is preserved; only scheme and host fold.
    assert_eq!(target.recompose(), "http://www.example.com/IMG/logo.gif");
    assert!(target.valid);
}

#[test]
fn resolve_reference_rejects_unnormalizable_targets() {
    let base = parse("http://www.example.com/docs/index.html");
    let err = resolve::resolve_reference(&base, "bad path.html", true)
        .expect_err("space is not a pchar");
    assert_eq!(err, Error::InvalidPath);
}

#[test]
fn resolve_reference_folds_scheme_and_host() {
    let base = parse("hTTp://www.Example.COM/a/b.html");
    let target = resolve::resolve_reference(&base, "c.html", true).expect("resolvable href");
    assert_eq!(target.recompose(), "http://www.example.com/a/c.html");
}

#[test]
fn non_strict_mode_treats_same_scheme_href_as_relative() {
    let base = parse("http://www.example.com/a/b");
    let target =
        resolve::resolve_reference(&base, "http:c.html", false).expect("resolvable href");
    assert_eq!(target.recompose(), "http://www.example.com/a/c.html");
}
