#![no_main]
use aibom_diff::parsers::parse_aibom_str;
use aibom_diff::DiffEngine;
use libfuzzer_sys::fuzz_target;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the AIBOM parser, and the diff engine on whatever parses.
///
/// Input is also wrapped as the component list of a minimal envelope so
/// that most runs get past document-level validation.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_aibom_str(s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"{{"bomFormat":"CycloneDX","specVersion":"1.6","metadata":{{"component":{{"name":"fuzz"}}}},"components":[{s}]}}"#,
            );
            if let Ok(doc) = parse_aibom_str(&wrapped) {
                let _ = DiffEngine::new().diff(&doc, &doc);
            }
        }
    }
});
