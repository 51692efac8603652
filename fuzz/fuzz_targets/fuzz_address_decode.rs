#![no_main]

use chanvote_crypto::{decode_address, encode_address};
use libfuzzer_sys::fuzz_target;

// Any text that decodes as an address must re-encode to an address that
// decodes to the same parts.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(decoded) = decode_address(text) {
        let encoded = encode_address(decoded.version, decoded.stream, &decoded.ripe)
            .expect("decoded parts re-encode");
        assert_eq!(decode_address(encoded.as_str()), Ok(decoded));
    }
});
