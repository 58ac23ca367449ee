//! Public entry points (C11): the standalone parse functions beyond the main `Uri::parse`.

use uris::{parse_authority, parse_origin_form, parse_path, parse_uri, UriRead};

#[test]
fn parse_origin_form_accepts_request_target_shape() {
    let u = parse_origin_form("/a/b?x=1").unwrap();
    assert_eq!(u.encoded_path(), b"/a/b");
    assert!(u.has_query());
    assert!(parse_origin_form("http://example.com/").is_err());
}

#[test]
fn parse_authority_recovers_userinfo_host_and_port() {
    let u = parse_authority("user:pass@example.com:8080").unwrap();
    assert_eq!(u.encoded_user(), b"user");
    assert_eq!(u.encoded_password(), b"pass");
    assert_eq!(u.encoded_host(), b"example.com");
    assert_eq!(u.port_number(), Some(8080));
}

#[test]
fn parse_path_validates_segment_grammar_without_building_a_uri() {
    assert!(parse_path("/a/b/c").is_ok());
    assert!(parse_path("a/b").is_ok());
    assert!(parse_path("/a/b%2").is_err());
}

#[test]
fn parse_uri_rejects_relative_references() {
    assert!(parse_uri("http://example.com/").is_ok());
    assert!(parse_uri("//example.com/").is_err());
    assert!(parse_uri("/a/b").is_err());
}

#[cfg(feature = "stack")]
#[test]
fn stack_uri_enforces_its_compile_time_capacity() {
    use uris::stack::StackUri;

    assert!(StackUri::<16>::parse("http://example.com/").is_err());
    let small = StackUri::<64>::parse("http://example.com/").unwrap();
    assert_eq!(small.as_uri().encoded_host(), b"example.com");
}
