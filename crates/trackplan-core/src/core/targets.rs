// crates/trackplan-core/src/core/targets.rs
// ============================================================================
// Module: Trackplan Target Table
// Description: Target-group table and baseline schemas supplied by the plan.
// Purpose: Define the engine's inbound interface from the configuration loader.
// Dependencies: crate::core::{identifiers, payload}, serde
// ============================================================================

//! ## Overview
//! The configuration loader hands the engine two things: the authoritative
//! target table (the `all` list plus named selector groups) and the plan's
//! baseline field schemas (a global layer plus per-target overrides). Both
//! are read-only inputs; the engine never mutates them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::SelectorName;
use crate::core::identifiers::TargetId;
use crate::core::payload::FieldMap;

// ============================================================================
// SECTION: Target Table
// ============================================================================

/// Authoritative target table from the tracking plan.
///
/// # Invariants
/// - `all` lists every concrete target the plan recognizes.
/// - Group member lists reference only targets present in `all`; the loader
///   validates this before the table reaches the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTable {
    /// Every concrete target identifier the plan recognizes.
    pub all: Vec<TargetId>,
    /// Named selector groups mapping to concrete target sets.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<SelectorName, Vec<TargetId>>,
}

impl TargetTable {
    /// Returns true when the identifier names a concrete target in `all`.
    #[must_use]
    pub fn is_target(&self, id: &str) -> bool {
        self.all.iter().any(|target| target.as_str() == id)
    }

    /// Expands a selector name to the concrete targets it covers.
    ///
    /// A named group expands to its member list; a selector naming a member
    /// of `all` expands to a singleton; anything else yields `None`.
    #[must_use]
    pub fn expand(&self, selector: &SelectorName) -> Option<Vec<TargetId>> {
        if let Some(members) = self.groups.get(selector) {
            return Some(members.clone());
        }
        if self.is_target(selector.as_str()) {
            return Some(vec![TargetId::new(selector.as_str())]);
        }
        None
    }
}

// ============================================================================
// SECTION: Baseline Schemas
// ============================================================================

/// Baseline field schemas declared by the plan.
///
/// # Invariants
/// - `overrides` keys reference targets present in the plan's target table;
///   the loader validates this before the baseline reaches the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecBaseline {
    /// Global baseline fields merged beneath every target's schemas.
    #[serde(default)]
    pub global: FieldMap,
    /// Per-target baseline overrides merged over the global layer.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<TargetId, FieldMap>,
}

// ============================================================================
// SECTION: Resolution Spec
// ============================================================================

/// Complete inbound interface for one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSpec {
    /// Target table from the plan.
    pub targets: TargetTable,
    /// Baseline schemas from the plan.
    #[serde(default)]
    pub baseline: SpecBaseline,
}
