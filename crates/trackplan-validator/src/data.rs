// crates/trackplan-validator/src/data.rs
// ============================================================================
// Module: Event Data Checks
// Description: Instance-level field rules for concrete event data objects.
// Purpose: Validate captured data values against a fully resolved schema.
// Dependencies: regex, serde_json, trackplan-core
// ============================================================================

//! ## Overview
//! Instance checks run a concrete data object against one resolved version
//! schema: required presence, declared-type conformance, enum and dictionary
//! membership, pinned-value equality, numeric ranges, string lengths, regex
//! patterns, and array item constraints. Missing or invalid values degrade
//! to issues; like the resolver, the checks never abort a run mid-way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;
use trackplan_core::DictName;
use trackplan_core::FieldMap;
use trackplan_core::FieldSpec;
use trackplan_core::FieldType;
use trackplan_core::IssueList;
use trackplan_core::IssuePath;
use trackplan_core::PayloadIssue;

// ============================================================================
// SECTION: Data Checks
// ============================================================================

/// Validates a concrete data object against one resolved version schema.
///
/// Issues are rooted at `data`; the caller prefixes file and event context.
#[must_use]
pub fn check_event_data(
    schema: &FieldMap,
    data: &Value,
    dicts: &BTreeMap<DictName, Vec<String>>,
) -> Vec<PayloadIssue> {
    let root = IssuePath::new("data");
    let mut issues = IssueList::new();

    let Value::Object(object) = data else {
        issues.push(&root, "Invalid event data: expected object");
        return issues.into_entries();
    };

    for (name, field) in schema {
        let path = root.join(name.as_str());
        match object.get(name.as_str()) {
            Some(value) => check_value(field, value, dicts, &path, &mut issues),
            None => {
                if field.is_required() {
                    issues.push(&path, "Missing required field");
                }
            }
        }
    }

    for key in object.keys() {
        if !schema.keys().any(|name| name.as_str() == key) {
            issues.push(&root.join(key), "Unknown field not declared in schema");
        }
    }

    issues.into_entries()
}

// ============================================================================
// SECTION: Value Checks
// ============================================================================

/// Runs every applicable rule for one field value.
fn check_value(
    field: &FieldSpec,
    value: &Value,
    dicts: &BTreeMap<DictName, Vec<String>>,
    path: &IssuePath,
    issues: &mut IssueList,
) {
    if let Some(field_type) = field.field_type
        && !matches_type(field_type, value)
    {
        issues.push(path, format!("Expected value of type '{}'", field_type.as_str()));
        return;
    }

    if let Some(pinned) = &field.value
        && value != pinned
    {
        issues.push(path, "Value does not match the pinned constant");
    }
    if let Some(allowed) = &field.enum_values
        && !allowed.contains(value)
    {
        issues.push(path, "Value is not a member of the declared enum");
    }
    if let Some(dict) = &field.dict {
        check_dict_membership(dict, value, dicts, path, issues);
    }

    check_numeric_bounds(field, value, path, issues);
    check_string_rules(field, value, path, issues);
    check_array_rules(field, value, path, issues);
}

/// Returns true when the value conforms to the declared type.
fn matches_type(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::String => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Integer => value.is_i64() || value.is_u64(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Array => value.is_array(),
    }
}

/// Checks dictionary membership for string values.
fn check_dict_membership(
    dict: &DictName,
    value: &Value,
    dicts: &BTreeMap<DictName, Vec<String>>,
    path: &IssuePath,
    issues: &mut IssueList,
) {
    let Some(allowed) = dicts.get(dict) else {
        issues.push(path, format!("Unknown dictionary '{dict}'"));
        return;
    };
    let Value::String(text) = value else {
        issues.push(path, "Dictionary-constrained value must be a string");
        return;
    };
    if !allowed.iter().any(|entry| entry == text) {
        issues.push(path, format!("Value is not a member of dictionary '{dict}'"));
    }
}

/// Checks numeric range constraints.
fn check_numeric_bounds(field: &FieldSpec, value: &Value, path: &IssuePath, issues: &mut IssueList) {
    let Some(number) = value.as_f64() else {
        return;
    };
    if let Some(minimum) = field.minimum
        && number < minimum
    {
        issues.push(path, format!("Value is below the minimum of {minimum}"));
    }
    if let Some(maximum) = field.maximum
        && number > maximum
    {
        issues.push(path, format!("Value is above the maximum of {maximum}"));
    }
}

/// Checks string length and pattern constraints.
fn check_string_rules(field: &FieldSpec, value: &Value, path: &IssuePath, issues: &mut IssueList) {
    let Value::String(text) = value else {
        return;
    };
    let length = text.chars().count() as u64;
    if let Some(min_length) = field.min_length
        && length < min_length
    {
        issues.push(path, format!("String is shorter than {min_length} characters"));
    }
    if let Some(max_length) = field.max_length
        && length > max_length
    {
        issues.push(path, format!("String is longer than {max_length} characters"));
    }
    if let Some(pattern) = &field.pattern {
        match Regex::new(pattern) {
            Ok(regex) => {
                if !regex.is_match(text) {
                    issues.push(path, format!("String does not match pattern '{pattern}'"));
                }
            }
            Err(_) => {
                issues.push(path, format!("Invalid pattern '{pattern}' in schema"));
            }
        }
    }
}

/// Checks array item count and item type constraints.
fn check_array_rules(field: &FieldSpec, value: &Value, path: &IssuePath, issues: &mut IssueList) {
    let Value::Array(items) = value else {
        return;
    };
    let count = items.len() as u64;
    if let Some(min_items) = field.min_items
        && count < min_items
    {
        issues.push(path, format!("Array has fewer than {min_items} items"));
    }
    if let Some(max_items) = field.max_items
        && count > max_items
    {
        issues.push(path, format!("Array has more than {max_items} items"));
    }
    if let Some(item_type) = field.item_type {
        for (index, item) in items.iter().enumerate() {
            if !matches_type(item_type, item) {
                issues.push(
                    &path.index(index),
                    format!("Expected array item of type '{}'", item_type.as_str()),
                );
            }
        }
    }
}
