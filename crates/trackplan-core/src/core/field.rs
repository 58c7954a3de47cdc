// crates/trackplan-core/src/core/field.rs
// ============================================================================
// Module: Trackplan Field Schema
// Description: Leaf field schema entries for payload versions.
// Purpose: Define the canonical field shape merged across plan and event layers.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! A field is the leaf entry of a payload schema: an optional declared type,
//! at most one value-selection mechanism (`enum`, `dict`, or fixed `value`),
//! requiredness flags, range and length constraints, and free-form tooling
//! and PII parameter maps.
//!
//! Exclusivity of the selection mechanisms is enforced by the merge step, not
//! by construction: an override may legitimately replace one mechanism with
//! another, so a field at a single layer can be authored with any subset and
//! the merge clears the losers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::DictName;

// ============================================================================
// SECTION: Field Types
// ============================================================================

/// Declared value type for a field.
///
/// # Invariants
/// - Variants are stable wire names for authored plans and event files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// UTF-8 string value.
    String,
    /// Floating-point or integral numeric value.
    Number,
    /// Integral numeric value.
    Integer,
    /// Boolean value.
    Boolean,
    /// Array of values constrained by the item constraints.
    Array,
}

impl FieldType {
    /// Returns the stable wire name for the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

/// Leaf schema entry for one payload field.
///
/// # Invariants
/// - After merge, at most one of `enum_values`, `dict`, and `value` is set;
///   a single authored layer may carry any subset (the merge resolves it).
/// - `value_required = true` implies the field must be required wherever it
///   is declared; the contradiction is diagnosed by the merge step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    /// Declared value type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Closed list of allowed literal values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Name of an external enumeration dictionary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dict: Option<DictName>,
    /// Fixed pinned value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Whether the field must be present in event data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Whether the field's value must be pinned to a constant wherever the
    /// field is required or explicitly declared.
    #[serde(rename = "valueRequired", skip_serializing_if = "Option::is_none")]
    pub value_required: Option<bool>,
    /// Inclusive numeric lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive numeric upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum string length.
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Regex pattern that string values must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Declared type for array items.
    #[serde(rename = "itemType", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<FieldType>,
    /// Minimum array item count.
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Maximum array item count.
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Free-form tooling-check parameters, merged key-by-key across layers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub checks: BTreeMap<String, Value>,
    /// Free-form PII metadata, merged key-by-key across layers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pii: BTreeMap<String, Value>,
}

impl FieldSpec {
    /// Returns true when the field carries a closed enum list.
    #[must_use]
    pub const fn has_enum(&self) -> bool {
        self.enum_values.is_some()
    }

    /// Returns true when the field references an external dictionary.
    #[must_use]
    pub const fn has_dict(&self) -> bool {
        self.dict.is_some()
    }

    /// Returns true when the field pins a fixed value.
    #[must_use]
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Counts the value-selection mechanisms set on this field.
    #[must_use]
    pub const fn selection_count(&self) -> usize {
        self.has_enum() as usize + self.has_dict() as usize + self.has_value() as usize
    }

    /// Returns true when the field is marked required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Returns true when the field demands a pinned value.
    #[must_use]
    pub fn is_value_required(&self) -> bool {
        self.value_required.unwrap_or(false)
    }
}
