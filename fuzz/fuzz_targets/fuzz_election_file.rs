#![no_main]

use chanvote_election::Election;
use libfuzzer_sys::fuzz_target;

// Parsing arbitrary election files never panics; accepted files survive a
// save/read cycle unchanged.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(election) = Election::from_file_str(text) {
        let saved = election.to_file_string().expect("accepted election serialises");
        assert_eq!(Election::from_file_str(&saved).ok(), Some(election));
    }
});
