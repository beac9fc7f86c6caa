//! Property-based tests for the AIBOM parser and advisory feed.
//!
//! Parsers must reject garbage with an error, never a panic.

use aibom_diff::parsers::parse_aibom_str;
use aibom_diff::risk::{parse_lenient, AdvisoryFeed};
use proptest::prelude::*;

proptest! {
    // Parser tests only assert no-panic since random input is expected
    // to produce Err in almost all cases.
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn parse_aibom_str_doesnt_panic(s in "\\PC{0,2000}") {
        let result = parse_aibom_str(&s);
        prop_assert!(result.is_err(), "Random input should not parse successfully: {:?}", s);
    }

    #[test]
    fn json_like_input_doesnt_panic(
        s in prop::string::string_regex(r#"\{[^\}]{0,500}\}"#).unwrap()
    ) {
        let _ = parse_aibom_str(&s);
    }

    #[test]
    fn arbitrary_component_fields_dont_panic(
        name in "\\PC{0,40}",
        version in "\\PC{0,20}",
        kind in "(model-weights|tokenizer|dataset|library|\\PC{0,12})",
        format in "\\PC{0,16}",
    ) {
        let doc = serde_json::json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.6",
            "metadata": { "component": { "name": "prop/model" } },
            "components": [{
                "type": kind,
                "name": name,
                "version": version,
                "properties": [{ "name": "aibom:format", "value": format }]
            }]
        });
        let _ = parse_aibom_str(&doc.to_string());
    }

    #[test]
    fn advisory_feed_doesnt_panic(s in "\\PC{0,500}") {
        let _ = AdvisoryFeed::parse(&s);
    }

    #[test]
    fn lenient_versions_accept_padded_forms(
        major in 0u64..100,
        minor in proptest::option::of(0u64..100),
    ) {
        let text = match minor {
            Some(m) => format!("v{major}.{m}"),
            None => major.to_string(),
        };
        let parsed = parse_lenient(&text);
        prop_assert!(parsed.is_some(), "{} should parse", text);
        let v = parsed.unwrap();
        prop_assert_eq!(v.major, major);
        prop_assert_eq!(v.minor, minor.unwrap_or(0));
    }
}
