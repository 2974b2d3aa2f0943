//! Normalization of untrusted rebuttal output
//!
//! Total: any candidate, however malformed, becomes a fully populated
//! [`RebuttalResult`].

use crate::contracts::{fields, RebuttalCandidate, RebuttalResult, UNCATEGORIZED};

/// Coerce a candidate into the fixed result shape
///
/// Text fields are trimmed strings or `""`. The category falls back to the
/// request category and then to [`UNCATEGORIZED`].
pub fn sanitize(candidate: &RebuttalCandidate, request_category: Option<&str>) -> RebuttalResult {
    let text = |field: &str| -> String {
        candidate
            .text(field)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let category = non_empty(candidate.text(fields::CATEGORY))
        .or_else(|| non_empty(request_category))
        .unwrap_or(UNCATEGORIZED)
        .to_string();

    RebuttalResult {
        acknowledge: text(fields::ACKNOWLEDGE),
        differentiate: text(fields::DIFFERENTIATE),
        anchor: text(fields::ANCHOR),
        close: text(fields::CLOSE),
        script: text(fields::SCRIPT),
        category,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn well_formed() -> RebuttalCandidate {
        RebuttalCandidate::from_value(json!({
            "acknowledge": "  I hear you.  ",
            "differentiate": "\tThis pays for itself.",
            "anchor": "One deal covers it.\n",
            "close": " Shall we start? ",
            "script": " Full script ",
            "category": " Price Objection "
        }))
        .unwrap()
    }

    #[test]
    fn test_trims_every_field() {
        let result = sanitize(&well_formed(), None);
        assert_eq!(result.acknowledge, "I hear you.");
        assert_eq!(result.differentiate, "This pays for itself.");
        assert_eq!(result.anchor, "One deal covers it.");
        assert_eq!(result.close, "Shall we start?");
        assert_eq!(result.script, "Full script");
        assert_eq!(result.category, "Price Objection");
    }

    #[test]
    fn test_missing_and_non_string_fields_become_empty() {
        let candidate = RebuttalCandidate::from_value(json!({
            "acknowledge": 42,
            "differentiate": null,
            "anchor": ["a"],
            "close": { "text": "c" },
            "category": true
        }))
        .unwrap();

        let result = sanitize(&candidate, None);
        assert_eq!(result.acknowledge, "");
        assert_eq!(result.differentiate, "");
        assert_eq!(result.anchor, "");
        assert_eq!(result.close, "");
        assert_eq!(result.script, "");
        assert_eq!(result.category, UNCATEGORIZED);
    }

    #[test]
    fn test_category_precedence() {
        let blank = RebuttalCandidate::new().with(fields::CATEGORY, "   ");
        assert_eq!(sanitize(&blank, Some("Trust")).category, "Trust");
        assert_eq!(sanitize(&blank, Some("  ")).category, UNCATEGORIZED);
        assert_eq!(sanitize(&blank, None).category, UNCATEGORIZED);

        let set = RebuttalCandidate::new().with(fields::CATEGORY, "Timing");
        assert_eq!(sanitize(&set, Some("Trust")).category, "Timing");
    }

    #[test]
    fn test_empty_candidate() {
        let result = sanitize(&RebuttalCandidate::new(), Some("Price Objection"));
        assert_eq!(result.script, "");
        assert_eq!(result.category, "Price Objection");
    }

    #[test]
    fn test_sanitizing_twice_is_a_no_op() {
        let once = sanitize(&well_formed(), Some("Other"));
        let twice = sanitize(&RebuttalCandidate::from(once.clone()), Some("Other"));
        assert_eq!(once, twice);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "\\PC{0,24}".prop_map(Value::String),
            "[ \\t\\n]{0,3}[a-z ]{0,12}[ \\t\\n]{0,3}".prop_map(Value::String),
        ];
        leaf.prop_recursive(2, 8, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..3)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn arb_candidate() -> impl Strategy<Value = RebuttalCandidate> {
        prop::collection::vec(
            (prop::sample::select(fields::ALL.to_vec()), arb_json()),
            0..8,
        )
        .prop_map(|entries| {
            let map: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            RebuttalCandidate::from(map)
        })
    }

    proptest! {
        #[test]
        fn prop_result_is_always_trimmed_with_a_category(
            candidate in arb_candidate(),
            request_category in proptest::option::of("\\PC{0,12}"),
        ) {
            let result = sanitize(&candidate, request_category.as_deref());
            for value in [
                &result.acknowledge,
                &result.differentiate,
                &result.anchor,
                &result.close,
                &result.script,
                &result.category,
            ] {
                prop_assert_eq!(value.trim(), value.as_str());
            }
            prop_assert!(!result.category.is_empty());
        }

        #[test]
        fn prop_sanitize_is_idempotent(
            candidate in arb_candidate(),
            request_category in proptest::option::of("[A-Za-z ]{0,12}"),
        ) {
            let once = sanitize(&candidate, request_category.as_deref());
            let twice = sanitize(&RebuttalCandidate::from(once.clone()), request_category.as_deref());
            prop_assert_eq!(once, twice);
        }
    }
}
