//! Mutation-sequence and invariant-preservation tests (spec.md §8 items 1-2 and the
//! self-intersection-safety requirement of §4.6).

use uris::{Uri, UriRead};

#[test]
fn literal_mutation_sequence_from_the_specification() {
    // §8 item 2: starting from `https://www.example.com`, set scheme to http, host to an
    // IPv4 literal, port to 8080, and drop userinfo; expect `http://192.168.0.1:8080`.
    let mut u = Uri::parse("https://www.example.com").unwrap();
    u.set_encoded_scheme(b"http").unwrap();
    u.set_host_ipv4(uris::address::Ipv4Address::parse(b"192.168.0.1").unwrap()).unwrap();
    u.set_port(8080).unwrap();
    u.remove_userinfo().unwrap();
    assert_eq!(u.string(), "http://192.168.0.1:8080");
}

#[test]
fn self_intersection_safety_across_every_setter_pair() {
    // §4.6: a setter must behave correctly even when its source bytes alias the owner's own
    // buffer (e.g. `u.set_fragment(u.path())`), because the splice that makes room for the
    // new bytes can relocate or overwrite the very slice being copied from.
    let mut u = Uri::parse("http://example.com/a/b?q=1#f").unwrap();
    let path = u.encoded_path().to_vec();
    u.set_encoded_fragment(&path).unwrap();
    assert_eq!(u.encoded_fragment(), b"/a/b");

    let mut u = Uri::parse("http://example.com/a/b?q=1#f").unwrap();
    let query = u.encoded_query().to_vec();
    u.set_encoded_path(&query).unwrap();
    assert_eq!(u.encoded_path(), b"q=1");

    let mut u = Uri::parse("http://example.com/a/b?q=1#f").unwrap();
    let frag = u.encoded_fragment().to_vec();
    u.set_encoded_query(&frag).unwrap();
    assert_eq!(u.encoded_query(), b"f");
}

#[test]
fn segment_and_parameter_edits_keep_buffer_consistent() {
    let mut u = Uri::parse("http://example.com/a/b?x=1&y=2#frag").unwrap();
    u.segments_mut().push_back(b"c", true, true).unwrap();
    assert_eq!(u.encoded_path(), b"/a/b/c");
    assert_eq!(u.encoded_query(), b"x=1&y=2");
    assert_eq!(u.encoded_fragment(), b"frag");

    u.params_mut().set(b"x", b"99", false).unwrap();
    assert_eq!(u.encoded_query(), b"x=99&y=2");
    assert_eq!(u.encoded_path(), b"/a/b/c");
    assert_eq!(u.encoded_fragment(), b"frag");

    u.params_mut().unset(1).unwrap();
    assert_eq!(u.encoded_query(), b"x=99&y");
}

#[test]
fn encoded_origin_reflects_scheme_and_authority_presence() {
    let u = Uri::parse("https://example.com/a").unwrap();
    assert_eq!(u.encoded_origin(), b"https://example.com");

    let rel = Uri::parse("/a/b").unwrap();
    assert!(rel.encoded_origin().is_empty());

    let no_authority = Uri::parse("mailto:a@b.com").unwrap();
    assert!(no_authority.encoded_origin().is_empty());
}

#[test]
fn size_tracks_the_encoded_buffer_length() {
    let u = Uri::parse("http://example.com/a/b?q=1").unwrap();
    assert_eq!(u.size(), "http://example.com/a/b?q=1".len());
}
