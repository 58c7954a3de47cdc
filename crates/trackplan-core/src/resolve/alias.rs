// crates/trackplan-core/src/resolve/alias.rs
// ============================================================================
// Module: Trackplan Alias Resolver
// Description: Alias chasing within one selector scope's version map.
// Purpose: Collapse alias chains to concrete version keys with cycle detection.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Within a scope, a reference name resolves to itself when it names a
//! version, or chases the alias table until a version key is reached. The
//! chase carries an explicit visited list, so cycles terminate
//! deterministically. Every name touched by a chase is memoized, failures
//! included, so one defective chain yields exactly one issue no matter how
//! many declarations reach it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::IssueList;
use crate::core::IssuePath;
use crate::core::NormalizedTargetPayload;
use crate::core::VersionKey;

// ============================================================================
// SECTION: Alias Resolver
// ============================================================================

/// Per-scope alias resolution state.
///
/// # Invariants
/// - A name naming both a version and an alias resolves to the version; raw
///   version keys are treated as already resolved.
/// - Memoized outcomes (success or failure) are stable for the lifetime of
///   one resolution run.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    /// Version keys present in the scope.
    versions: BTreeSet<String>,
    /// Alias table declared by the scope.
    aliases: BTreeMap<String, String>,
    /// Memoized chase outcomes, failures included.
    resolved: BTreeMap<String, Option<VersionKey>>,
}

impl AliasResolver {
    /// Builds the resolver for one normalized scope.
    #[must_use]
    pub fn for_scope(payload: &NormalizedTargetPayload) -> Self {
        Self {
            versions: payload.versions().keys().map(|key| key.as_str().to_string()).collect(),
            aliases: payload.aliases(),
            resolved: BTreeMap::new(),
        }
    }

    /// Resolves a reference name to a concrete version key.
    ///
    /// Returns `None` when the chain is cyclic or dangles; the first chase to
    /// discover the defect records one issue at `path`, later chases reuse
    /// the memoized failure silently.
    pub fn resolve(
        &mut self,
        reference: &str,
        path: &IssuePath,
        issues: &mut IssueList,
    ) -> Option<VersionKey> {
        if let Some(cached) = self.resolved.get(reference) {
            return cached.clone();
        }

        let mut visited: Vec<String> = Vec::new();
        let mut current = reference.to_string();
        let outcome = loop {
            if self.versions.contains(&current) {
                break Some(VersionKey::new(current.as_str()));
            }
            if let Some(cached) = self.resolved.get(&current) {
                break cached.clone();
            }
            if visited.contains(&current) {
                issues.push(path, format!("Alias cycle detected at '{current}'"));
                break None;
            }
            visited.push(current.clone());
            match self.aliases.get(&current) {
                Some(next) => current = next.clone(),
                None => {
                    issues.push(path, format!("'{current}' does not resolve to a version key"));
                    break None;
                }
            }
        };

        for name in visited {
            self.resolved.insert(name, outcome.clone());
        }
        self.resolved.insert(reference.to_string(), outcome.clone());
        outcome
    }
}
