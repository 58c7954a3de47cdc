// crates/trackplan-validator/src/schema.rs
// ============================================================================
// Module: Resolved Schema Checks
// Description: Schema-level checks over fully resolved payloads.
// Purpose: Flag merge survivors the resolver intentionally leaves to the validator.
// Dependencies: trackplan-core
// ============================================================================

//! ## Overview
//! The resolver merges layers and reports layer conflicts; the checks the
//! data model delegates downstream live here. A resolved field must keep at
//! most one value-selection mechanism, a `valueRequired` field must actually
//! pin a value, and every `dict` reference must name a dictionary the plan
//! declares. These checks run on the resolver's output and never re-derive
//! merge or cycle logic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use trackplan_core::DictName;
use trackplan_core::FieldSpec;
use trackplan_core::IssueList;
use trackplan_core::IssuePath;
use trackplan_core::PayloadIssue;
use trackplan_core::ResolvedEventPayload;

// ============================================================================
// SECTION: Schema Checks
// ============================================================================

/// Runs schema-level checks over every target and version of a resolved
/// payload.
#[must_use]
pub fn check_resolved_payload(
    resolved: &ResolvedEventPayload,
    dicts: &BTreeMap<DictName, Vec<String>>,
) -> Vec<PayloadIssue> {
    let mut issues = IssueList::new();
    for (target, payload) in &resolved.targets {
        let target_path = IssuePath::root().join(target.as_str());
        for (version, resolved_version) in &payload.versions {
            let version_path = target_path.join(version.as_str()).join("schema");
            for (name, field) in &resolved_version.schema {
                check_field(field, dicts, &version_path.join(name.as_str()), &mut issues);
            }
        }
    }
    issues.into_entries()
}

/// Checks one resolved field.
fn check_field(
    field: &FieldSpec,
    dicts: &BTreeMap<DictName, Vec<String>>,
    path: &IssuePath,
    issues: &mut IssueList,
) {
    if field.selection_count() > 1 {
        issues.push(path, "Field declares more than one of enum, dict, and value");
    }
    if field.is_value_required() && !field.has_value() {
        issues.push(path, "Field declares valueRequired but pins no value");
    }
    if let Some(dict) = &field.dict
        && !dicts.contains_key(dict)
    {
        issues.push(path, format!("Unknown dictionary '{dict}'"));
    }
}
