// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for svnscope
//!
//! These tests use proptest to verify invariants hold for arbitrary inputs,
//! ensuring robustness against edge cases and malformed data.

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

use svnscope::handlers::{
    HandlerError, ListFilesInput, ReadFileInput, Revision, SvnFileInput, SvnLogInput,
    log_start_date, parse_input,
};
use svnscope::router::Operation;

// ============================================================================
// Strategies
// ============================================================================

/// Generate arbitrary strings including edge cases
fn arbitrary_string() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("".to_string()),
        Just(" ".to_string()),
        Just("\t\n\r".to_string()),
        Just("中文路径/文件.txt".to_string()),
        Just("C:\\Users\\svn\\wc".to_string()),
        Just("/path with spaces/file".to_string()),
        Just("\"quoted\" $HOME `id`".to_string()),
        Just("a".repeat(1000)),
        "[a-zA-Z0-9]{1,50}".prop_map(|s| s),
        ".*{0,100}".prop_map(|s| s),
    ]
}

/// Generate arbitrary JSON values
fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        arbitrary_string().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,10}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn to_map(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

// ============================================================================
// Input Parsing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Parsing never panics; failures are always InvalidInput
    #[test]
    fn prop_parse_input_never_panics(value in arbitrary_json()) {
        let args = to_map(value);
        for result in [
            parse_input::<SvnLogInput>(args.clone()).err(),
            parse_input::<ReadFileInput>(args.clone()).err(),
            parse_input::<SvnFileInput>(args.clone()).err(),
            parse_input::<ListFilesInput>(args).err(),
        ]
        .into_iter()
        .flatten()
        {
            prop_assert!(matches!(result, HandlerError::InvalidInput(_)));
        }
    }

    /// Any string path round-trips through the input types
    #[test]
    fn prop_paths_preserved(path in arbitrary_string()) {
        let input: ReadFileInput =
            parse_input(to_map(json!({ "filePath": path.clone() }))).expect("parse");
        prop_assert_eq!(input.file_path, path.clone());

        let input: ListFilesInput =
            parse_input(to_map(json!({ "dirPath": path.clone() }))).expect("parse");
        prop_assert_eq!(input.dir_path, path);
    }

    /// Numeric and string revisions render the same way
    #[test]
    fn prop_revision_forms_agree(rev in 0u64..10_000_000) {
        let numeric: SvnFileInput =
            parse_input(to_map(json!({ "filePath": "/wc/a", "revision": rev }))).expect("parse");
        let text: SvnFileInput = parse_input(to_map(
            json!({ "filePath": "/wc/a", "revision": rev.to_string() }),
        ))
        .expect("parse");

        prop_assert_eq!(numeric.revision.clone(), Revision::Number(rev));
        prop_assert_eq!(numeric.revision.to_string(), text.revision.to_string());
    }

    /// Omitted days always means the default window
    #[test]
    fn prop_days_default(dir in "[a-z/]{1,30}") {
        let input: SvnLogInput =
            parse_input(to_map(json!({ "dirPath": dir }))).expect("parse");
        prop_assert_eq!(input.days, 7);
    }

    /// The log window starts exactly `days` before today and never panics
    #[test]
    fn prop_log_start_date(offset in 0i64..100_000, days in any::<u32>()) {
        let today = NaiveDate::from_ymd_opt(1970, 1, 1).expect("date")
            + chrono::Duration::days(offset);
        let start = log_start_date(today, days);
        prop_assert!(start <= today);
        if start != NaiveDate::MIN {
            prop_assert_eq!((today - start).num_days(), i64::from(days));
        }
    }

    /// Operation names parse back to themselves; anything else is rejected
    #[test]
    fn prop_operation_names(name in arbitrary_string()) {
        match name.parse::<Operation>() {
            Ok(op) => prop_assert_eq!(op.name(), name.as_str()),
            Err(_) => prop_assert!(Operation::ALL.iter().all(|op| op.name() != name)),
        }
    }
}
