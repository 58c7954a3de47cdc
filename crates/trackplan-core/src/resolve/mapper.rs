// crates/trackplan-core/src/resolve/mapper.rs
// ============================================================================
// Module: Trackplan Selector Mapper
// Description: Expansion of named selectors into concrete target coverage.
// Purpose: Enforce single-selector coverage and surface every overlap claim.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The mapper expands each selector name into the concrete targets it covers
//! using the plan's target table, and records which selector owns each
//! target. The first selector seen to claim a target wins for further
//! processing (selectors iterate in name order, so the winner is
//! deterministic), but every subsequent claim is reported: detection, not
//! silent precedence, is the contract. Targets no selector claims are simply
//! absent from the resolved output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::IssueList;
use crate::core::IssuePath;
use crate::core::NormalizedTargetPayload;
use crate::core::SelectorName;
use crate::core::TargetId;
use crate::core::TargetTable;

// ============================================================================
// SECTION: Coverage
// ============================================================================

/// Target coverage produced by selector expansion.
///
/// # Invariants
/// - Each target maps to exactly one owning selector (the first claimant).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetCoverage {
    /// Owning selector per covered target.
    pub target_to_selector: BTreeMap<TargetId, SelectorName>,
}

impl TargetCoverage {
    /// Returns true when the selector owns at least one target.
    #[must_use]
    pub fn owns_targets(&self, selector: &SelectorName) -> bool {
        self.target_to_selector.values().any(|owner| owner == selector)
    }

    /// Returns the targets owned by a selector, in target order.
    #[must_use]
    pub fn targets_of(&self, selector: &SelectorName) -> Vec<TargetId> {
        self.target_to_selector
            .iter()
            .filter(|(_, owner)| *owner == selector)
            .map(|(target, _)| target.clone())
            .collect()
    }
}

// ============================================================================
// SECTION: Selector Expansion
// ============================================================================

/// Expands every selector of a normalized event payload into target coverage.
///
/// Unknown selector names are reported and skipped; their payload is dropped,
/// not merged. Overlapping claims keep the first owner and report each later
/// claimant, naming both selectors.
pub fn map_selectors(
    table: &TargetTable,
    selectors: &BTreeMap<SelectorName, NormalizedTargetPayload>,
    issues: &mut IssueList,
) -> TargetCoverage {
    let root = IssuePath::root();
    let mut coverage = TargetCoverage::default();

    for selector in selectors.keys() {
        let path = root.join(selector.as_str());
        let Some(targets) = table.expand(selector) else {
            issues.push(&path, format!("Unknown selector '{selector}'"));
            continue;
        };
        for target in targets {
            if let Some(owner) = coverage.target_to_selector.get(&target) {
                issues.push(
                    &path,
                    format!("Target '{target}' claimed by both '{owner}' and '{selector}'"),
                );
                continue;
            }
            coverage.target_to_selector.insert(target, selector.clone());
        }
    }

    coverage
}
