//! Property-based tests (C1/C4) mirroring the teacher's `tests/proptest_scheme.rs` approach:
//! round-trip the percent-codec over arbitrary input, and fuzz the scheme token grammar.

use proptest::prelude::*;
use uris::chars::UNRESERVED;
use uris::pct::{decode, encode, CodecOptions};
use uris::{parse_uri, UriRead};

proptest! {
    #[test]
    fn decode_of_encode_recovers_original_bytes(bytes in prop::collection::vec(1u8..=255u8, 0..64)) {
        let options = CodecOptions::default();
        let encoded = encode(&bytes, &UNRESERVED, options);
        let decoded = decode(&encoded, options).unwrap();
        prop_assert_eq!(decoded, bytes);
    }

    #[test]
    fn any_scheme_token_round_trips_through_a_parsed_uri(scheme in "[a-zA-Z][a-zA-Z0-9+.\\-]{0,15}") {
        let text = format!("{scheme}://host/path");
        let u = parse_uri(&text).unwrap();
        prop_assert_eq!(u.scheme().unwrap().to_ascii_lowercase(), scheme.to_ascii_lowercase());
    }
}
