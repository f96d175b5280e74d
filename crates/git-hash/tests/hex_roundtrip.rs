use git_hash::hex::{hex_to_bytes, hex_to_sha, hex_to_string, is_valid_hex, sha_to_hex};
use git_hash::hasher::Hasher;
use git_hash::ObjectId;
use proptest::prelude::*;

proptest! {
    #[test]
    fn hex_encode_decode_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let hex = hex_to_string(&bytes);
        let decoded = hex_to_bytes(hex.as_bytes()).unwrap();
        prop_assert_eq!(&decoded, &bytes);
    }

    #[test]
    fn hex_is_always_lowercase(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        let hex = hex_to_string(&bytes);
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        prop_assert!(is_valid_hex(hex.as_bytes()));
    }

    #[test]
    fn sha_hex_sha_roundtrip(bytes in any::<[u8; 20]>()) {
        let hex = sha_to_hex(&bytes).unwrap();
        prop_assert_eq!(hex.len(), 40);
        prop_assert_eq!(hex_to_sha(hex.as_bytes()).unwrap(), bytes);
    }

    #[test]
    fn hex_sha_hex_roundtrip(hex in "[0-9a-f]{40}") {
        let sha = hex_to_sha(hex.as_bytes()).unwrap();
        prop_assert_eq!(sha_to_hex(&sha).unwrap(), hex);
    }

    #[test]
    fn oid_display_parse_roundtrip(bytes in any::<[u8; 20]>()) {
        let oid = ObjectId::new(bytes);
        let parsed: ObjectId = oid.to_hex().parse().unwrap();
        prop_assert_eq!(oid, parsed);
    }

    #[test]
    fn wrong_length_hex_rejected(hex in "[0-9a-f]{0,80}") {
        prop_assume!(hex.len() != 40);
        prop_assert!(hex_to_sha(hex.as_bytes()).is_err());
    }

    #[test]
    fn hashing_is_deterministic(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
        let a = Hasher::hash_object("blob", &payload).unwrap();
        let b = Hasher::hash_object("blob", &payload).unwrap();
        prop_assert_eq!(a, b);
    }
}
