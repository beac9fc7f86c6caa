#![no_main]
use aibom_diff::risk::{parse_lenient, AdvisoryFeed};
use libfuzzer_sys::fuzz_target;

/// Fuzz advisory feed parsing and lenient version handling.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = AdvisoryFeed::parse(s);
        let _ = parse_lenient(s);
    }
});
