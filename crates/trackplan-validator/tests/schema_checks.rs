// crates/trackplan-validator/tests/schema_checks.rs
// ============================================================================
// Module: Schema Check Tests
// Description: Post-merge schema checks over resolved payloads.
// Purpose: Ensure exclusivity, pinning, and dictionary checks fire downstream.
// Dependencies: serde_json, trackplan-core, trackplan-validator
// ============================================================================

//! Schema-level check tests over resolved payload output.

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

use serde_json::json;
use trackplan_core::DictName;
use trackplan_core::FieldName;
use trackplan_core::FieldSpec;
use trackplan_core::ResolvedEventPayload;
use trackplan_core::ResolvedPayloadVersion;
use trackplan_core::ResolvedTargetPayload;
use trackplan_core::TargetId;
use trackplan_core::VersionKey;
use trackplan_validator::check_resolved_payload;

/// Builds a resolved payload with one web target and one field.
fn resolved_with_field(name: &str, field: FieldSpec) -> ResolvedEventPayload {
    let mut schema = BTreeMap::new();
    schema.insert(FieldName::new(name), field);
    let mut versions = BTreeMap::new();
    versions.insert(
        VersionKey::new("v1"),
        ResolvedPayloadVersion {
            meta: BTreeMap::new(),
            schema,
        },
    );
    let mut targets = BTreeMap::new();
    targets.insert(
        TargetId::new("web"),
        ResolvedTargetPayload {
            current: VersionKey::new("v1"),
            aliases: BTreeMap::new(),
            versions,
        },
    );
    ResolvedEventPayload {
        targets,
    }
}

#[test]
fn well_formed_field_produces_no_issues() {
    let field = FieldSpec {
        enum_values: Some(vec![json!("red")]),
        required: Some(true),
        ..FieldSpec::default()
    };

    let issues = check_resolved_payload(&resolved_with_field("color", field), &BTreeMap::new());

    assert!(issues.is_empty());
}

#[test]
fn surviving_double_selection_is_flagged() {
    let field = FieldSpec {
        enum_values: Some(vec![json!("red")]),
        value: Some(json!("red")),
        ..FieldSpec::default()
    };

    let issues = check_resolved_payload(&resolved_with_field("color", field), &BTreeMap::new());

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "payload.web.v1.schema.color");
    assert_eq!(issues[0].message, "Field declares more than one of enum, dict, and value");
}

#[test]
fn value_required_without_pinned_value_is_flagged() {
    let field = FieldSpec {
        value_required: Some(true),
        required: Some(true),
        ..FieldSpec::default()
    };

    let issues = check_resolved_payload(&resolved_with_field("app_id", field), &BTreeMap::new());

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Field declares valueRequired but pins no value");
}

#[test]
fn unknown_dictionary_reference_is_flagged() {
    let field = FieldSpec {
        dict: Some(DictName::new("colors")),
        ..FieldSpec::default()
    };

    let issues = check_resolved_payload(&resolved_with_field("color", field), &BTreeMap::new());

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Unknown dictionary 'colors'");
}

#[test]
fn declared_dictionary_reference_passes() {
    let field = FieldSpec {
        dict: Some(DictName::new("colors")),
        ..FieldSpec::default()
    };
    let mut dicts = BTreeMap::new();
    dicts.insert(DictName::new("colors"), vec!["red".to_string(), "blue".to_string()]);

    let issues = check_resolved_payload(&resolved_with_field("color", field), &dicts);

    assert!(issues.is_empty());
}
