// crates/trackplan-core/src/resolve/mod.rs
// ============================================================================
// Module: Trackplan Payload Resolution
// Description: Orchestration of the four payload resolution stages.
// Purpose: Turn a raw event payload and plan spec into resolved target schemas.
// Dependencies: crate::core, crate::resolve::{alias, mapper, merge, normalize, reference}
// ============================================================================

//! ## Overview
//! Resolution runs four cooperating stages over in-memory data: the
//! normalizer classifies raw shape, the mapper expands selectors to concrete
//! targets, the alias resolver collapses reference names, and the reference
//! resolver merges `$ref` inheritance. The plan's baseline layers are merged
//! beneath each resolved version, and the same merge law applies at every
//! boundary.
//!
//! The engine is purely synchronous and allocation-only: no I/O, no locks,
//! no mutation of inputs. The memo cache lives inside one
//! [`resolve_event_payload`] call, so independent events may resolve
//! concurrently from separate threads.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod alias;
pub mod mapper;
pub mod merge;
pub mod normalize;
pub mod reference;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::IssueList;
use crate::core::IssuePath;
use crate::core::NormalizedTargetPayload;
use crate::core::PayloadIssue;
use crate::core::ResolutionSpec;
use crate::core::ResolvedEventPayload;
use crate::core::ResolvedPayloadVersion;
use crate::core::ResolvedTargetPayload;
use crate::core::SelectorName;
use crate::core::VersionKey;
use crate::core::payload::FieldMap;
use crate::resolve::mapper::map_selectors;
use crate::resolve::merge::merge_field_maps;
use crate::resolve::normalize::normalize_event_payload;
use crate::resolve::reference::RefResolver;
use crate::resolve::reference::version_path;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use alias::AliasResolver;
pub use mapper::TargetCoverage;
pub use merge::merge_field;
pub use normalize::normalize_target_payload;

// ============================================================================
// SECTION: Resolution Output
// ============================================================================

/// Output of one payload resolution run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadResolution {
    /// Resolved payloads per covered target.
    pub payload: ResolvedEventPayload,
    /// Every non-fatal diagnostic found during the run, in traversal order.
    pub issues: Vec<PayloadIssue>,
}

/// Per-selector scope resolution, shared by every target the selector owns.
struct ScopeResolution {
    /// Version key selected as current.
    current: VersionKey,
    /// Alias table collapsed to concrete version keys.
    aliases: BTreeMap<String, VersionKey>,
    /// Ref-resolved versions, before baseline layering.
    versions: BTreeMap<VersionKey, ResolvedPayloadVersion>,
}

// ============================================================================
// SECTION: Resolution Entry Point
// ============================================================================

/// Resolves one event's raw payload against the plan spec.
///
/// Never fails: every data-shape problem degrades the failing unit (one
/// target, one version, one alias) to an empty or omitted result plus an
/// accumulated issue, so one bad declaration cannot suppress diagnostics for
/// the rest of the event.
#[must_use]
pub fn resolve_event_payload(spec: &ResolutionSpec, raw: &Value) -> PayloadResolution {
    let mut issues = IssueList::new();

    let scopes = normalize_event_payload(raw, &mut issues);
    let coverage = map_selectors(&spec.targets, &scopes, &mut issues);
    let mut resolver = RefResolver::new(&scopes);

    let mut scope_resolutions: BTreeMap<SelectorName, ScopeResolution> = BTreeMap::new();
    for (selector, payload) in &scopes {
        if !coverage.owns_targets(selector) {
            continue;
        }
        if let Some(resolution) = resolve_scope(selector, payload, &mut resolver, &mut issues) {
            scope_resolutions.insert(selector.clone(), resolution);
        }
    }

    let payload =
        apply_baseline_layers(spec, &coverage, &scope_resolutions, &mut issues);

    PayloadResolution {
        payload,
        issues: issues.into_entries(),
    }
}

// ============================================================================
// SECTION: Scope Resolution
// ============================================================================

/// Resolves one selector scope: every declared version, the alias table, and
/// the current pointer.
///
/// Versions resolve before `current` so a scope whose current pointer
/// dangles still surfaces its `$ref` and merge diagnostics; the scope itself
/// is then dropped (no version can be current), which omits the selector's
/// targets from the output without affecting siblings.
fn resolve_scope(
    selector: &SelectorName,
    payload: &NormalizedTargetPayload,
    resolver: &mut RefResolver<'_>,
    issues: &mut IssueList,
) -> Option<ScopeResolution> {
    match payload {
        NormalizedTargetPayload::Invalid => None,
        NormalizedTargetPayload::Unversioned(_) => {
            let key = VersionKey::unversioned();
            let origin = version_path(selector, &key);
            let resolved = resolver.resolve_version(selector, &key, &origin, issues);
            let mut versions = BTreeMap::new();
            versions.insert(key.clone(), resolved);
            Some(ScopeResolution {
                current: key,
                aliases: BTreeMap::new(),
                versions,
            })
        }
        NormalizedTargetPayload::Versioned(declared) => {
            let scope_path = IssuePath::root().join(selector.as_str());

            let mut versions = BTreeMap::new();
            for key in declared.versions.keys() {
                let origin = version_path(selector, key);
                versions
                    .insert(key.clone(), resolver.resolve_version(selector, key, &origin, issues));
            }

            let mut aliases = BTreeMap::new();
            for (alias, target) in &declared.aliases {
                let alias_path = scope_path.join(alias);
                if let Some(key) = resolver.resolve_alias(selector, target, &alias_path, issues) {
                    aliases.insert(alias.clone(), key);
                }
            }

            let current_path = scope_path.join("current");
            let current =
                resolver.resolve_alias(selector, &declared.current_ref, &current_path, issues)?;

            Some(ScopeResolution {
                current,
                aliases,
                versions,
            })
        }
    }
}

// ============================================================================
// SECTION: Baseline Layering
// ============================================================================

/// Merges the plan's baseline layers beneath every resolved version and
/// assembles the per-target output.
///
/// Targets without a per-target override share one merge per (selector,
/// version) against the global baseline, so a conflict between the baseline
/// and an event schema is reported exactly once. Targets with an override
/// merge their own spec base, since the conflict set differs per target.
fn apply_baseline_layers(
    spec: &ResolutionSpec,
    coverage: &TargetCoverage,
    scope_resolutions: &BTreeMap<SelectorName, ScopeResolution>,
    issues: &mut IssueList,
) -> ResolvedEventPayload {
    let mut global_merged: BTreeMap<(SelectorName, VersionKey), FieldMap> = BTreeMap::new();
    let mut targets = BTreeMap::new();

    for (target, selector) in &coverage.target_to_selector {
        let Some(scope) = scope_resolutions.get(selector) else {
            continue;
        };

        let target_override = spec
            .baseline
            .overrides
            .get(target)
            .filter(|fields| !fields.is_empty());
        let spec_base = match target_override {
            Some(fields) => {
                let base_path = IssuePath::root().join(target.as_str());
                Some(merge_field_maps(&spec.baseline.global, fields, &base_path, issues))
            }
            None => None,
        };

        let mut versions = BTreeMap::new();
        for (key, resolved) in &scope.versions {
            let schema_path = version_path(selector, key).join("schema");
            let schema = match &spec_base {
                Some(base) => merge_field_maps(base, &resolved.schema, &schema_path, issues),
                None => {
                    let cache_key = (selector.clone(), key.clone());
                    match global_merged.get(&cache_key) {
                        Some(cached) => cached.clone(),
                        None => {
                            let merged = merge_field_maps(
                                &spec.baseline.global,
                                &resolved.schema,
                                &schema_path,
                                issues,
                            );
                            global_merged.insert(cache_key, merged.clone());
                            merged
                        }
                    }
                }
            };
            versions.insert(
                key.clone(),
                ResolvedPayloadVersion {
                    meta: resolved.meta.clone(),
                    schema,
                },
            );
        }

        targets.insert(
            target.clone(),
            ResolvedTargetPayload {
                current: scope.current.clone(),
                aliases: scope.aliases.clone(),
                versions,
            },
        );
    }

    ResolvedEventPayload {
        targets,
    }
}
