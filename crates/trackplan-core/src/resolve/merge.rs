// crates/trackplan-core/src/resolve/merge.rs
// ============================================================================
// Module: Trackplan Schema Merge
// Description: The single merge law applied at every schema layer boundary.
// Purpose: Combine base and override field maps with conflict diagnostics.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! One merge law serves every layer boundary: global baseline into per-target
//! override, spec base into event version, and `$ref` base into referencing
//! version. Override properties replace base properties; setting any of the
//! value-selection mechanisms (`value`, `enum`, `dict`) clears the other two
//! inherited ones, so exactly one mechanism survives per field; nested `pii`
//! and `checks` maps merge key-by-key.
//!
//! Conflicts are reported, never fatal: the merge proceeds with the
//! override's value so downstream validation still sees a complete schema.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::FieldSpec;
use crate::core::IssueList;
use crate::core::IssuePath;
use crate::core::payload::FieldMap;

// ============================================================================
// SECTION: Map Merge
// ============================================================================

/// Merges a base field map beneath an override field map.
///
/// Fields present in only one map pass through unchanged; fields present in
/// both are merged per [`merge_field`]. Conflict issues are reported under
/// `path.<field>`.
#[must_use]
pub fn merge_field_maps(
    base: &FieldMap,
    over: &FieldMap,
    path: &IssuePath,
    issues: &mut IssueList,
) -> FieldMap {
    let mut out = base.clone();
    for (name, over_field) in over {
        let merged = match base.get(name) {
            Some(base_field) => {
                merge_field(base_field, over_field, &path.join(name.as_str()), issues)
            }
            None => {
                let field = over_field.clone();
                check_self_contradiction(&field, &path.join(name.as_str()), issues);
                field
            }
        };
        out.insert(name.clone(), merged);
    }
    out
}

// ============================================================================
// SECTION: Field Merge
// ============================================================================

/// Merges one base field beneath one override field.
///
/// Diagnoses type mismatches and required-strength weakening before merging;
/// the merge itself always completes with override properties winning.
#[must_use]
pub fn merge_field(
    base: &FieldSpec,
    over: &FieldSpec,
    path: &IssuePath,
    issues: &mut IssueList,
) -> FieldSpec {
    diagnose_conflicts(base, over, path, issues);

    let mut out = FieldSpec {
        field_type: over.field_type.or(base.field_type),
        enum_values: None,
        dict: None,
        value: None,
        required: over.required.or(base.required),
        value_required: over.value_required.or(base.value_required),
        minimum: over.minimum.or(base.minimum),
        maximum: over.maximum.or(base.maximum),
        min_length: over.min_length.or(base.min_length),
        max_length: over.max_length.or(base.max_length),
        pattern: over.pattern.clone().or_else(|| base.pattern.clone()),
        item_type: over.item_type.or(base.item_type),
        min_items: over.min_items.or(base.min_items),
        max_items: over.max_items.or(base.max_items),
        checks: merged_map(&base.checks, &over.checks),
        pii: merged_map(&base.pii, &over.pii),
    };

    if over.selection_count() > 0 {
        out.enum_values = over.enum_values.clone();
        out.dict = over.dict.clone();
        out.value = over.value.clone();
    } else {
        out.enum_values = base.enum_values.clone();
        out.dict = base.dict.clone();
        out.value = base.value.clone();
    }

    check_self_contradiction(&out, path, issues);
    out
}

/// Reports cross-layer conflicts between a base field and its override.
fn diagnose_conflicts(base: &FieldSpec, over: &FieldSpec, path: &IssuePath, issues: &mut IssueList) {
    if let (Some(base_type), Some(over_type)) = (base.field_type, over.field_type)
        && base_type != over_type
    {
        issues.push(
            path,
            format!(
                "Type mismatch: base '{}' vs override '{}'",
                base_type.as_str(),
                over_type.as_str()
            ),
        );
    }
    if base.required == Some(true) && over.required == Some(false) {
        issues.push(path, "Cannot weaken required field");
    }
    if base.value_required == Some(true) && over.value_required == Some(false) {
        issues.push(path, "Cannot weaken valueRequired field");
    }
    if base.value_required == Some(true) && over.required == Some(false) {
        issues.push(path, "valueRequired field cannot be made optional");
    }
}

/// Reports a field that ends up demanding a pinned value while explicitly
/// optional, regardless of which layer introduced either flag.
fn check_self_contradiction(field: &FieldSpec, path: &IssuePath, issues: &mut IssueList) {
    if field.value_required == Some(true) && field.required == Some(false) {
        issues.push(path, "Field declares valueRequired but is not required");
    }
}

/// Merges two free-form parameter maps key-by-key, override winning per key.
fn merged_map(
    base: &BTreeMap<String, Value>,
    over: &BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    let mut out = base.clone();
    for (key, value) in over {
        out.insert(key.clone(), value.clone());
    }
    out
}
