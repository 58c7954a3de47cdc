// crates/trackplan-core/src/resolve/normalize.rs
// ============================================================================
// Module: Trackplan Payload Normalizer
// Description: Classification of raw event payload trees into normalized shapes.
// Purpose: Turn untyped loader output into the tagged union later stages match on.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! The normalizer is the only stage that inspects raw shape. It classifies
//! each selector's payload value into unversioned, versioned, or invalid, and
//! records a shape issue for everything it cannot classify. It has no other
//! side effects and always returns a value, so one malformed event cannot
//! abort the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;

use crate::core::FieldName;
use crate::core::FieldSpec;
use crate::core::IssueList;
use crate::core::IssuePath;
use crate::core::NormalizedTargetPayload;
use crate::core::PayloadVersion;
use crate::core::SelectorName;
use crate::core::VersionKey;
use crate::core::payload::FieldMap;
use crate::core::payload::VersionedPayload;

// ============================================================================
// SECTION: Event Normalization
// ============================================================================

/// Normalizes a raw event payload into per-selector payloads.
///
/// A plain object carrying a `schema` or `current` key is shorthand for a
/// single declaration under the `all` selector; any other object is treated
/// as a selector-keyed map. Non-object payloads degrade to a single invalid
/// `all` declaration with one shape issue.
pub fn normalize_event_payload(
    raw: &Value,
    issues: &mut IssueList,
) -> BTreeMap<SelectorName, NormalizedTargetPayload> {
    let root = IssuePath::root();
    let mut out = BTreeMap::new();

    match raw {
        Value::Object(map) if !is_payload_shorthand(map) => {
            for (selector, value) in map {
                let path = root.join(selector);
                let normalized = normalize_target_payload(value, &path, issues);
                out.insert(SelectorName::new(selector.as_str()), normalized);
            }
        }
        _ => {
            let normalized = normalize_target_payload(raw, &root, issues);
            out.insert(SelectorName::new("all"), normalized);
        }
    }

    out
}

/// Returns true when the object is a single payload declaration rather than
/// a selector-keyed map.
fn is_payload_shorthand(map: &Map<String, Value>) -> bool {
    map.contains_key("schema") || map.contains_key("current")
}

// ============================================================================
// SECTION: Target Normalization
// ============================================================================

/// Classifies one selector's raw payload value.
///
/// Unrecognized shapes yield [`NormalizedTargetPayload::Invalid`] plus one
/// issue; downstream stages skip the selector instead of failing.
pub fn normalize_target_payload(
    raw: &Value,
    path: &IssuePath,
    issues: &mut IssueList,
) -> NormalizedTargetPayload {
    let Value::Object(map) = raw else {
        issues.push(path, "Invalid target payload: expected {schema,...} or {current,...}");
        return NormalizedTargetPayload::Invalid;
    };

    if map.contains_key("schema") {
        let version = normalize_version(map, path, issues);
        return NormalizedTargetPayload::Unversioned(version);
    }

    if let Some(Value::String(current)) = map.get("current") {
        return normalize_versioned(current, map, path, issues);
    }

    issues.push(path, "Invalid target payload: expected {schema,...} or {current,...}");
    NormalizedTargetPayload::Invalid
}

/// Classifies the non-`current` keys of a versioned declaration into aliases
/// and versions.
fn normalize_versioned(
    current: &str,
    map: &Map<String, Value>,
    path: &IssuePath,
    issues: &mut IssueList,
) -> NormalizedTargetPayload {
    let mut aliases = BTreeMap::new();
    let mut versions = BTreeMap::new();

    for (key, value) in map {
        if key == "current" {
            continue;
        }
        let entry_path = path.join(key);
        if key.starts_with('$') {
            issues.push(&entry_path, "Invalid version entry");
            continue;
        }
        match value {
            Value::String(target) => {
                aliases.insert(key.clone(), target.clone());
            }
            Value::Object(entry) if entry.contains_key("schema") => {
                let version = normalize_version(entry, &entry_path, issues);
                versions.insert(VersionKey::new(key.as_str()), version);
            }
            _ => {
                issues.push(&entry_path, "Invalid version entry");
            }
        }
    }

    NormalizedTargetPayload::Versioned(VersionedPayload {
        current_ref: current.to_string(),
        aliases,
        versions,
    })
}

// ============================================================================
// SECTION: Version Normalization
// ============================================================================

/// Parses one version object (`$ref`, `meta`, `schema`) field by field so a
/// single bad declaration degrades to an issue instead of rejecting the
/// whole version.
fn normalize_version(
    map: &Map<String, Value>,
    path: &IssuePath,
    issues: &mut IssueList,
) -> PayloadVersion {
    let reference = match map.get("$ref") {
        None => None,
        Some(Value::String(reference)) => Some(reference.clone()),
        Some(_) => {
            issues.push(&path.join("$ref"), "Invalid $ref: expected string");
            None
        }
    };

    let meta = match map.get("meta") {
        None => BTreeMap::new(),
        Some(Value::Object(meta)) => {
            meta.iter().map(|(key, value)| (key.clone(), value.clone())).collect()
        }
        Some(_) => {
            issues.push(&path.join("meta"), "Invalid meta: expected object");
            BTreeMap::new()
        }
    };

    let schema = match map.get("schema") {
        None => FieldMap::new(),
        Some(Value::Object(fields)) => normalize_schema(fields, &path.join("schema"), issues),
        Some(_) => {
            issues.push(&path.join("schema"), "Invalid schema: expected object");
            FieldMap::new()
        }
    };

    PayloadVersion {
        reference,
        meta,
        schema,
    }
}

/// Parses a schema map, skipping fields that fail to deserialize.
fn normalize_schema(
    fields: &Map<String, Value>,
    path: &IssuePath,
    issues: &mut IssueList,
) -> FieldMap {
    let mut out = FieldMap::new();
    for (name, value) in fields {
        let field_path = path.join(name);
        if !value.is_object() {
            issues.push(&field_path, "Invalid field declaration: expected object");
            continue;
        }
        match serde_json::from_value::<FieldSpec>(value.clone()) {
            Ok(spec) => {
                out.insert(FieldName::new(name.as_str()), spec);
            }
            Err(err) => {
                issues.push(&field_path, format!("Invalid field declaration: {err}"));
            }
        }
    }
    out
}
