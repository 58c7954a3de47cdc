// crates/trackplan-core/src/resolve/reference.rs
// ============================================================================
// Module: Trackplan Reference Resolver
// Description: $ref inheritance resolution across version and selector scopes.
// Purpose: Produce fully merged version schemas with cycle-safe memoization.
// Dependencies: crate::core, crate::resolve::{alias, merge}
// ============================================================================

//! ## Overview
//! A version may declare `$ref` to inherit fields from another version, in
//! the same scope or in a different selector scope (`"<scope>::<name>"`).
//! Resolution recursively computes the base version's schema and merges it
//! beneath the referencing version's own schema.
//!
//! Recursion is guarded by an explicit in-progress stack of `scope::version`
//! identifiers; re-entering an identifier reports one cycle issue and
//! substitutes the unmerged own schema so the graph still terminates.
//! Results are memoized per identifier in a cache scoped to one resolution
//! call, so diamond dependencies resolve once and never duplicate reports.
//!
//! Cross-scope references read the raw normalized per-selector data: a scope
//! rejected by the overlap check (or not claiming any target) is still a
//! valid reference base.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::DEFAULT_VERSION_KEY;
use crate::core::IssueList;
use crate::core::IssuePath;
use crate::core::NormalizedTargetPayload;
use crate::core::PayloadVersion;
use crate::core::ResolvedPayloadVersion;
use crate::core::SCOPE_SEPARATOR;
use crate::core::SelectorName;
use crate::core::VersionKey;
use crate::resolve::alias::AliasResolver;
use crate::resolve::merge::merge_field_maps;

// ============================================================================
// SECTION: Resolver Context
// ============================================================================

/// Reference resolution context for one resolution call.
///
/// # Invariants
/// - The memo cache and alias state live exactly as long as one
///   `resolve_event_payload` call; nothing persists across events.
/// - `stack` holds the `scope::version` identifiers currently being
///   resolved, outermost first.
pub struct RefResolver<'a> {
    /// Raw normalized scopes, pre-overlap, keyed by selector.
    scopes: &'a BTreeMap<SelectorName, NormalizedTargetPayload>,
    /// Per-scope alias resolvers, built on first use.
    aliases: BTreeMap<SelectorName, AliasResolver>,
    /// Memoized resolved versions keyed by `scope::version`.
    memo: BTreeMap<String, ResolvedPayloadVersion>,
    /// In-progress resolution stack for cycle detection.
    stack: Vec<String>,
}

impl<'a> RefResolver<'a> {
    /// Creates a resolver over the raw normalized scopes of one event.
    #[must_use]
    pub fn new(scopes: &'a BTreeMap<SelectorName, NormalizedTargetPayload>) -> Self {
        Self {
            scopes,
            aliases: BTreeMap::new(),
            memo: BTreeMap::new(),
            stack: Vec::new(),
        }
    }

    /// Resolves a reference name within one scope through the alias table.
    pub fn resolve_alias(
        &mut self,
        scope: &SelectorName,
        reference: &str,
        path: &IssuePath,
        issues: &mut IssueList,
    ) -> Option<VersionKey> {
        let resolver = self.alias_resolver(scope)?;
        resolver.resolve(reference, path, issues)
    }

    /// Resolves one version's fully merged schema.
    ///
    /// `origin` names the declaration that requested the resolution (the
    /// referencing `$ref`, or the version itself at the top level); cycle
    /// issues are reported there.
    pub fn resolve_version(
        &mut self,
        scope: &SelectorName,
        key: &VersionKey,
        origin: &IssuePath,
        issues: &mut IssueList,
    ) -> ResolvedPayloadVersion {
        let id = format!("{scope}{SCOPE_SEPARATOR}{key}");
        if let Some(cached) = self.memo.get(&id) {
            return cached.clone();
        }

        let Some(version) = self.version_of(scope, key) else {
            // Callers resolve keys through the alias table first, so a
            // missing version here means the scope itself vanished; degrade
            // to an empty version rather than panic.
            return ResolvedPayloadVersion::default();
        };
        let version = version.clone();

        if let Some(position) = self.stack.iter().position(|entry| entry == &id) {
            let mut chain: Vec<&str> =
                self.stack[position..].iter().map(String::as_str).collect();
            chain.push(&id);
            issues.push(origin, format!("Cycle detected in $ref: {}", chain.join(" -> ")));
            return ResolvedPayloadVersion {
                meta: version.meta,
                schema: version.schema,
            };
        }

        self.stack.push(id.clone());
        let resolved = self.resolve_with_reference(scope, key, &version, issues);
        self.stack.pop();
        self.memo.insert(id, resolved.clone());
        resolved
    }

    /// Merges the version's base schema (if any) beneath its own schema.
    fn resolve_with_reference(
        &mut self,
        scope: &SelectorName,
        key: &VersionKey,
        version: &PayloadVersion,
        issues: &mut IssueList,
    ) -> ResolvedPayloadVersion {
        let own = ResolvedPayloadVersion {
            meta: version.meta.clone(),
            schema: version.schema.clone(),
        };
        let Some(reference) = &version.reference else {
            return own;
        };

        let ref_path = version_path(scope, key).join("$ref");
        let Some((base_scope, base_name)) =
            self.parse_reference(scope, reference, &ref_path, issues)
        else {
            return own;
        };
        let Some(base_key) = self.resolve_alias(&base_scope, &base_name, &ref_path, issues)
        else {
            return own;
        };

        let base = self.resolve_version(&base_scope, &base_key, &ref_path, issues);
        let schema_path = version_path(scope, key).join("schema");
        ResolvedPayloadVersion {
            meta: version.meta.clone(),
            schema: merge_field_maps(&base.schema, &version.schema, &schema_path, issues),
        }
    }

    /// Splits a `$ref` string into its scope and reference name.
    ///
    /// A bare name references the current scope; `<scope>::<name>` references
    /// the named selector scope.
    fn parse_reference(
        &self,
        current_scope: &SelectorName,
        reference: &str,
        ref_path: &IssuePath,
        issues: &mut IssueList,
    ) -> Option<(SelectorName, String)> {
        let Some((scope_part, name_part)) = reference.split_once(SCOPE_SEPARATOR) else {
            return Some((current_scope.clone(), reference.to_string()));
        };
        if scope_part.is_empty() || name_part.is_empty() {
            issues.push(ref_path, format!("Invalid $ref syntax: '{reference}'"));
            return None;
        }
        let scope = SelectorName::new(scope_part);
        if !self.scopes.contains_key(&scope) {
            issues.push(ref_path, format!("Unknown scope '{scope_part}' in $ref"));
            return None;
        }
        Some((scope, name_part.to_string()))
    }

    /// Returns the alias resolver for a scope, building it on first use.
    fn alias_resolver(&mut self, scope: &SelectorName) -> Option<&mut AliasResolver> {
        if !self.aliases.contains_key(scope) {
            let payload = self.scopes.get(scope)?;
            self.aliases.insert(scope.clone(), AliasResolver::for_scope(payload));
        }
        self.aliases.get_mut(scope)
    }

    /// Looks up a version declaration in a scope.
    fn version_of(&self, scope: &SelectorName, key: &VersionKey) -> Option<&PayloadVersion> {
        match self.scopes.get(scope)? {
            NormalizedTargetPayload::Unversioned(version) => {
                (key.as_str() == DEFAULT_VERSION_KEY).then_some(version)
            }
            NormalizedTargetPayload::Versioned(payload) => payload.versions.get(key),
            NormalizedTargetPayload::Invalid => None,
        }
    }
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Returns the issue path for one version declaration.
///
/// Unversioned payloads are addressed at the selector itself; named versions
/// at `payload.<selector>.<version>`.
#[must_use]
pub fn version_path(scope: &SelectorName, key: &VersionKey) -> IssuePath {
    let scope_path = IssuePath::root().join(scope.as_str());
    if key.as_str() == DEFAULT_VERSION_KEY {
        scope_path
    } else {
        scope_path.join(key.as_str())
    }
}
