#![no_main]

use chanvote_election::{decode_vote, encode_vote};
use libfuzzer_sys::fuzz_target;

// Decoding arbitrary payloads never panics, and whatever decodes re-encodes
// to the payload's first four bytes.
fuzz_target!(|data: &[u8]| {
    match decode_vote(data) {
        Ok(index) => assert_eq!(&encode_vote(index)[..], &data[..4]),
        Err(e) => assert!(data.len() < 4, "rejected a {}-byte payload: {e}", data.len()),
    }
});
