//! Well-known scheme classification (C4) and address value objects (C3) exercised through
//! parsed URIs.

use uris::scheme::{SchemeId, WellKnownScheme};
use uris::{parse_ip_future, parse_ipv4, parse_ipv6, parse_uri, UriRead};

#[test]
fn scheme_id_recognizes_the_six_well_known_schemes() {
    for (text, expected) in [
        ("ftp", WellKnownScheme::Ftp),
        ("FILE", WellKnownScheme::File),
        ("Http", WellKnownScheme::Http),
        ("HTTPS", WellKnownScheme::Https),
        ("ws", WellKnownScheme::Ws),
        ("WSS", WellKnownScheme::Wss),
    ] {
        let u = parse_uri(&format!("{text}://host/")).unwrap();
        assert_eq!(u.scheme_id(), SchemeId::Known(expected));
    }
    let u = parse_uri("mailto:a@b.com").unwrap();
    assert_eq!(u.scheme_id(), SchemeId::Unknown);
}

#[test]
fn host_kind_classifies_ipv4_ipv6_and_reg_name() {
    let v4 = parse_uri("http://192.168.1.1/").unwrap();
    assert_eq!(v4.host_kind(), uris::rules::HostKind::Ipv4);

    let v6 = parse_uri("http://[2001:db8::1]/").unwrap();
    assert_eq!(v6.host_kind(), uris::rules::HostKind::Ipv6);
    assert!(v6.host_ipv6().is_some());

    let name = parse_uri("http://example.com/").unwrap();
    assert_eq!(name.host_kind(), uris::rules::HostKind::RegName);
}

#[test]
fn standalone_address_parsers_reject_malformed_input() {
    assert!(parse_ipv4("999.1.1.1").is_err());
    assert!(parse_ipv4("192.168.0.1").is_ok());
    assert!(parse_ipv6("not-an-address").is_err());
    assert!(parse_ipv6("::1").is_ok());
    assert!(parse_ip_future("v1.fe80::1").is_ok());
    assert!(parse_ip_future("1.fe80::1").is_err());
}
