// crates/trackplan-core/src/core/payload.rs
// ============================================================================
// Module: Trackplan Payload Shapes
// Description: Normalized and resolved payload structures per selector and target.
// Purpose: Carry payload schemas from raw event trees to fully merged output.
// Dependencies: crate::core::{field, identifiers}, serde, serde_json
// ============================================================================

//! ## Overview
//! Payload shapes move through three representations. The normalizer
//! classifies a raw event tree into a [`NormalizedTargetPayload`] per
//! selector. The resolver expands selectors to concrete targets, chases
//! aliases and `$ref` inheritance, and produces a [`ResolvedTargetPayload`]
//! per target with no unresolved references left.
//!
//! Later stages match exhaustively on the [`NormalizedTargetPayload`] variant
//! instead of re-inspecting raw shape, so an invalid shape cannot silently
//! reach the merge logic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::field::FieldSpec;
use crate::core::identifiers::FieldName;
use crate::core::identifiers::TargetId;
use crate::core::identifiers::VersionKey;

// ============================================================================
// SECTION: Schema Maps
// ============================================================================

/// Field schema map keyed by field name.
pub type FieldMap = BTreeMap<FieldName, FieldSpec>;

// ============================================================================
// SECTION: Normalized Payloads
// ============================================================================

/// One concrete, addressable schema snapshot within a scope.
///
/// # Invariants
/// - `reference`, when set, names a version or alias in the same scope, or a
///   `scope::name` pair for cross-scope inheritance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadVersion {
    /// Declared inheritance source for this version.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Free-form version metadata, passed through to resolved output.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, Value>,
    /// Field schema declared by this version.
    #[serde(default)]
    pub schema: FieldMap,
}

/// Versioned payload declaration for one selector scope.
///
/// # Invariants
/// - `current_ref` and every alias value must resolve, through zero or more
///   alias hops, to a key present in `versions`; violations are reported by
///   the alias resolver, not by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionedPayload {
    /// Reference naming the current version, possibly through aliases.
    pub current_ref: String,
    /// Alias table mapping names to other aliases or version keys.
    pub aliases: BTreeMap<String, String>,
    /// Version table keyed by version name.
    pub versions: BTreeMap<VersionKey, PayloadVersion>,
}

/// Classified payload declaration for one selector scope.
///
/// Constructed once by the normalizer; every later stage matches on the
/// variant rather than re-inspecting raw shape.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedTargetPayload {
    /// Single synthetic version keyed by the reserved sentinel, no aliases.
    Unversioned(PayloadVersion),
    /// Named versions reachable through `current` and string aliases.
    Versioned(VersionedPayload),
    /// Unrecognized shape; the selector contributes nothing downstream.
    Invalid,
}

impl NormalizedTargetPayload {
    /// Returns the scope's version table view: the sentinel-keyed singleton
    /// for unversioned payloads, the declared table for versioned ones, and
    /// an empty view for invalid payloads.
    #[must_use]
    pub fn versions(&self) -> BTreeMap<VersionKey, &PayloadVersion> {
        match self {
            Self::Unversioned(version) => {
                let mut out = BTreeMap::new();
                out.insert(VersionKey::unversioned(), version);
                out
            }
            Self::Versioned(payload) => {
                payload.versions.iter().map(|(key, version)| (key.clone(), version)).collect()
            }
            Self::Invalid => BTreeMap::new(),
        }
    }

    /// Returns the scope's alias table, empty for unversioned and invalid
    /// payloads.
    #[must_use]
    pub fn aliases(&self) -> BTreeMap<String, String> {
        match self {
            Self::Versioned(payload) => payload.aliases.clone(),
            Self::Unversioned(_) | Self::Invalid => BTreeMap::new(),
        }
    }
}

// ============================================================================
// SECTION: Resolved Payloads
// ============================================================================

/// One version after all `$ref` inheritance has been merged in.
///
/// # Invariants
/// - `schema` contains no unresolved references; it is the full field map the
///   downstream validator runs checks against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPayloadVersion {
    /// Free-form version metadata carried over from the declaration.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, Value>,
    /// Fully merged field schema.
    pub schema: FieldMap,
}

/// Fully resolved payload for one concrete target.
///
/// # Invariants
/// - `current` names a key present in `versions`.
/// - Every alias value names a key present in `versions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTargetPayload {
    /// Version key selected as current.
    pub current: VersionKey,
    /// Alias table with every entry collapsed to a concrete version key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, VersionKey>,
    /// Resolved versions keyed by version name.
    pub versions: BTreeMap<VersionKey, ResolvedPayloadVersion>,
}

/// Resolved payloads for every covered target of one event.
///
/// Targets from the plan's `all` list with no claiming selector are simply
/// absent: the event is not defined for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedEventPayload {
    /// Resolved payloads keyed by concrete target.
    pub targets: BTreeMap<TargetId, ResolvedTargetPayload>,
}

impl ResolvedEventPayload {
    /// Returns the resolved payload for a target, if covered.
    #[must_use]
    pub fn target(&self, target: &TargetId) -> Option<&ResolvedTargetPayload> {
        self.targets.get(target)
    }

    /// Returns true when no target is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
