use proptest::prelude::*;

use chanvote_types::{Address, ContentHash, Timestamp};

proptest! {
    /// Hex rendering parses back to the same hash.
    #[test]
    fn content_hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = ContentHash::new(bytes);
        let parsed: ContentHash = hash.to_hex().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }

    /// Hex text is always 64 lowercase characters.
    #[test]
    fn content_hash_hex_shape(bytes in prop::array::uniform32(0u8..)) {
        let text = ContentHash::new(bytes).to_hex();
        prop_assert_eq!(text.len(), 64);
        prop_assert!(text.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Adding or removing the prefix never changes the address body.
    #[test]
    fn address_body_ignores_prefix(body in "[1-9A-HJ-NP-Za-km-z]{20,40}") {
        let bare = Address::new(body.clone());
        let prefixed = Address::new(format!("BM-{body}"));
        prop_assert_eq!(bare.body(), prefixed.body());
    }
}
