// crates/trackplan-config/src/plan.rs
// ============================================================================
// Module: Tracking Plan Model
// Description: Canonical tracking-plan specification with validation helpers.
// Purpose: Define the plan shape loaded from disk and validated before resolution.
// Dependencies: serde, serde_yaml, thiserror, trackplan-core
// ============================================================================

//! ## Overview
//! A tracking plan declares the target table (every concrete delivery target
//! plus named selector groups), the baseline field schemas merged beneath
//! every event, and the external dictionaries fields may reference. Plans
//! are validated at load time to enforce invariants such as unique target
//! identifiers and resolvable dictionary references; the resolution engine
//! assumes a validated plan.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use trackplan_core::DictName;
use trackplan_core::FieldMap;
use trackplan_core::FieldName;
use trackplan_core::FieldSpec;
use trackplan_core::ResolutionSpec;
use trackplan_core::SpecBaseline;
use trackplan_core::TargetTable;

// ============================================================================
// SECTION: Plan Model
// ============================================================================

/// Canonical tracking-plan specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingPlan {
    /// Target table: the authoritative `all` list plus named groups.
    pub targets: TargetTable,
    /// Baseline field schemas merged beneath every event.
    #[serde(default)]
    pub defaults: SpecBaseline,
    /// External dictionaries referenced by fields via `dict`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dicts: BTreeMap<DictName, Vec<String>>,
}

impl TrackingPlan {
    /// Validates the plan invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] when validation fails.
    pub fn validate(&self) -> Result<(), PlanError> {
        ensure_targets_declared(&self.targets)?;
        ensure_unique_targets(&self.targets)?;
        ensure_groups_resolve(&self.targets)?;
        ensure_groups_do_not_shadow(&self.targets)?;
        ensure_override_targets_known(self)?;
        ensure_fields_well_formed(self)?;
        ensure_dicts_resolve(self)?;
        Ok(())
    }

    /// Builds the resolution engine's inbound spec from the plan.
    #[must_use]
    pub fn resolution_spec(&self) -> ResolutionSpec {
        ResolutionSpec {
            targets: self.targets.clone(),
            baseline: self.defaults.clone(),
        }
    }

    /// Returns the dictionary values for a name, if declared.
    #[must_use]
    pub fn dict(&self, name: &DictName) -> Option<&[String]> {
        self.dicts.get(name).map(Vec::as_slice)
    }
}

// ============================================================================
// SECTION: Plan Loading
// ============================================================================

/// Loads and validates a tracking plan from a YAML file.
///
/// # Errors
///
/// Returns [`PlanError`] when the file cannot be read, parsed, or validated.
pub fn load_plan(path: &Path) -> Result<TrackingPlan, PlanError> {
    let text = fs::read_to_string(path)
        .map_err(|err| PlanError::Io(path.display().to_string(), err.to_string()))?;
    let plan: TrackingPlan = serde_yaml::from_str(&text)
        .map_err(|err| PlanError::Parse(path.display().to_string(), err.to_string()))?;
    plan.validate()?;
    Ok(plan)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tracking-plan loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Plan file could not be read.
    #[error("plan io error for {0}: {1}")]
    Io(String, String),
    /// Plan file could not be parsed as YAML.
    #[error("plan parse error for {0}: {1}")]
    Parse(String, String),
    /// Plan declares no targets.
    #[error("tracking plan must declare at least one target")]
    MissingTargets,
    /// Duplicate target identifiers detected.
    #[error("duplicate target identifier: {0}")]
    DuplicateTarget(String),
    /// Group member references an unknown target.
    #[error("group '{0}' references unknown target: {1}")]
    UnknownGroupMember(String, String),
    /// Group name shadows a concrete target identifier.
    #[error("group name shadows target identifier: {0}")]
    GroupShadowsTarget(String),
    /// Baseline override references an unknown target.
    #[error("defaults override references unknown target: {0}")]
    UnknownOverrideTarget(String),
    /// Field declares more than one value-selection mechanism at one scope.
    #[error("field '{0}' declares more than one of enum, dict, and value")]
    AmbiguousSelection(String),
    /// Field contradicts itself at a single scope.
    #[error("field '{0}' declares valueRequired but is not required")]
    ContradictoryField(String),
    /// Field references an undeclared dictionary.
    #[error("field '{0}' references unknown dictionary: {1}")]
    UnknownDictionary(String, String),
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures the plan declares at least one target.
fn ensure_targets_declared(targets: &TargetTable) -> Result<(), PlanError> {
    if targets.all.is_empty() {
        return Err(PlanError::MissingTargets);
    }
    Ok(())
}

/// Ensures target identifiers are unique.
fn ensure_unique_targets(targets: &TargetTable) -> Result<(), PlanError> {
    for (index, target) in targets.all.iter().enumerate() {
        if targets.all.iter().skip(index + 1).any(|other| other == target) {
            return Err(PlanError::DuplicateTarget(target.to_string()));
        }
    }
    Ok(())
}

/// Ensures group members reference targets present in `all`.
fn ensure_groups_resolve(targets: &TargetTable) -> Result<(), PlanError> {
    for (group, members) in &targets.groups {
        for member in members {
            if !targets.all.contains(member) {
                return Err(PlanError::UnknownGroupMember(
                    group.to_string(),
                    member.to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Ensures no group name collides with a concrete target identifier.
///
/// A selector naming a target expands to that target; a group with the same
/// name would make the expansion ambiguous.
fn ensure_groups_do_not_shadow(targets: &TargetTable) -> Result<(), PlanError> {
    for group in targets.groups.keys() {
        if targets.is_target(group.as_str()) {
            return Err(PlanError::GroupShadowsTarget(group.to_string()));
        }
    }
    Ok(())
}

/// Ensures baseline overrides reference known targets.
fn ensure_override_targets_known(plan: &TrackingPlan) -> Result<(), PlanError> {
    for target in plan.defaults.overrides.keys() {
        if !plan.targets.all.contains(target) {
            return Err(PlanError::UnknownOverrideTarget(target.to_string()));
        }
    }
    Ok(())
}

/// Ensures each baseline field is individually well-formed.
///
/// A single scope cannot rely on the merge step clearing a losing selection
/// mechanism, so the plan's own layers must be unambiguous as authored.
fn ensure_fields_well_formed(plan: &TrackingPlan) -> Result<(), PlanError> {
    for (name, field) in baseline_fields(plan) {
        if field.selection_count() > 1 {
            return Err(PlanError::AmbiguousSelection(name.to_string()));
        }
        if field.value_required == Some(true) && field.required == Some(false) {
            return Err(PlanError::ContradictoryField(name.to_string()));
        }
    }
    Ok(())
}

/// Ensures every `dict` reference names a declared dictionary.
fn ensure_dicts_resolve(plan: &TrackingPlan) -> Result<(), PlanError> {
    for (name, field) in baseline_fields(plan) {
        if let Some(dict) = &field.dict
            && !plan.dicts.contains_key(dict)
        {
            return Err(PlanError::UnknownDictionary(name.to_string(), dict.to_string()));
        }
    }
    Ok(())
}

/// Iterates every baseline field across the global and override layers.
fn baseline_fields(plan: &TrackingPlan) -> impl Iterator<Item = (&FieldName, &FieldSpec)> {
    plan.defaults
        .global
        .iter()
        .chain(plan.defaults.overrides.values().flat_map(FieldMap::iter))
}
