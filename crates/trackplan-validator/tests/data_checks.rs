// crates/trackplan-validator/tests/data_checks.rs
// ============================================================================
// Module: Data Check Tests
// Description: Instance-level field rules for concrete event data.
// Purpose: Ensure presence, type, membership, range, and pattern rules fire.
// Dependencies: serde_json, trackplan-core, trackplan-validator
// ============================================================================

//! Instance-level rule tests over resolved schemas.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;

use serde_json::Value;
use serde_json::json;
use trackplan_core::DictName;
use trackplan_core::FieldMap;
use trackplan_core::FieldName;
use trackplan_core::FieldSpec;
use trackplan_core::PayloadIssue;
use trackplan_validator::check_event_data;

/// Builds a one-field schema from a serialized field declaration.
fn schema_with(name: &str, field: Value) -> FieldMap {
    let mut schema = FieldMap::new();
    let field: FieldSpec = serde_json::from_value(field).expect("field parses");
    schema.insert(FieldName::new(name), field);
    schema
}

/// Runs the checks with an empty dictionary table.
fn check(schema: &FieldMap, data: &Value) -> Vec<PayloadIssue> {
    check_event_data(schema, data, &BTreeMap::new())
}

#[test]
fn conforming_data_produces_no_issues() {
    let schema = schema_with("user_id", json!({"type": "string", "required": true}));

    let issues = check(&schema, &json!({"user_id": "u-42"}));

    assert!(issues.is_empty());
}

#[test]
fn missing_required_field_is_flagged() {
    let schema = schema_with("user_id", json!({"type": "string", "required": true}));

    let issues = check(&schema, &json!({}));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "data.user_id");
    assert_eq!(issues[0].message, "Missing required field");
}

#[test]
fn missing_optional_field_passes() {
    let schema = schema_with("user_id", json!({"type": "string"}));

    let issues = check(&schema, &json!({}));

    assert!(issues.is_empty());
}

#[test]
fn type_mismatch_is_flagged() {
    let schema = schema_with("count", json!({"type": "integer"}));

    let issues = check(&schema, &json!({"count": "three"}));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Expected value of type 'integer'");
}

#[test]
fn enum_membership_is_enforced() {
    let schema = schema_with("color", json!({"enum": ["red", "blue"]}));

    let issues = check(&schema, &json!({"color": "green"}));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Value is not a member of the declared enum");
}

#[test]
fn dict_membership_is_enforced() {
    let schema = schema_with("color", json!({"dict": "colors"}));
    let mut dicts = BTreeMap::new();
    dicts.insert(DictName::new("colors"), vec!["red".to_string()]);

    let ok = check_event_data(&schema, &json!({"color": "red"}), &dicts);
    let bad = check_event_data(&schema, &json!({"color": "green"}), &dicts);

    assert!(ok.is_empty());
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].message, "Value is not a member of dictionary 'colors'");
}

#[test]
fn pinned_value_is_enforced() {
    let schema = schema_with("app_id", json!({"value": "storefront"}));

    let issues = check(&schema, &json!({"app_id": "checkout"}));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Value does not match the pinned constant");
}

#[test]
fn numeric_bounds_are_enforced() {
    let schema = schema_with("amount", json!({"type": "number", "minimum": 0, "maximum": 100}));

    let low = check(&schema, &json!({"amount": -1}));
    let high = check(&schema, &json!({"amount": 250}));
    let ok = check(&schema, &json!({"amount": 50}));

    assert_eq!(low.len(), 1);
    assert_eq!(high.len(), 1);
    assert!(ok.is_empty());
}

#[test]
fn string_length_and_pattern_are_enforced() {
    let schema = schema_with(
        "sku",
        json!({"type": "string", "minLength": 3, "maxLength": 8, "pattern": "^sku-"}),
    );

    let short = check(&schema, &json!({"sku": "s"}));
    let unmatched = check(&schema, &json!({"sku": "item-1"}));
    let ok = check(&schema, &json!({"sku": "sku-12"}));

    assert_eq!(short.len(), 2, "short value misses both length and pattern: {short:?}");
    assert_eq!(unmatched.len(), 1);
    assert!(ok.is_empty());
}

#[test]
fn array_item_rules_are_enforced() {
    let schema = schema_with(
        "tags",
        json!({"type": "array", "itemType": "string", "minItems": 1, "maxItems": 3}),
    );

    let empty = check(&schema, &json!({"tags": []}));
    let mixed = check(&schema, &json!({"tags": ["a", 2]}));
    let ok = check(&schema, &json!({"tags": ["a", "b"]}));

    assert_eq!(empty.len(), 1);
    assert_eq!(mixed.len(), 1);
    assert_eq!(mixed[0].path, "data.tags[1]");
    assert!(ok.is_empty());
}

#[test]
fn undeclared_field_is_flagged() {
    let schema = schema_with("user_id", json!({"type": "string"}));

    let issues = check(&schema, &json!({"user_id": "u-1", "rogue": true}));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "data.rogue");
    assert_eq!(issues[0].message, "Unknown field not declared in schema");
}

#[test]
fn non_object_data_degrades_to_one_issue() {
    let schema = schema_with("user_id", json!({"type": "string"}));

    let issues = check(&schema, &json!("not an object"));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Invalid event data: expected object");
}
