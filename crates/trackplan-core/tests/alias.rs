// crates/trackplan-core/tests/alias.rs
// ============================================================================
// Module: Alias Resolver Tests
// Description: Alias chasing, idempotence, and cycle termination.
// Purpose: Ensure alias chains collapse deterministically with one issue per defect.
// Dependencies: serde_json, trackplan-core
// ============================================================================

//! Alias resolution behavior tests, including boundary-length cycles.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;

use serde_json::json;
use trackplan_core::AliasResolver;
use trackplan_core::IssueList;
use trackplan_core::IssuePath;
use trackplan_core::NormalizedTargetPayload;
use trackplan_core::PayloadVersion;
use trackplan_core::ResolutionSpec;
use trackplan_core::SelectorName;
use trackplan_core::TargetId;
use trackplan_core::TargetTable;
use trackplan_core::VersionKey;
use trackplan_core::VersionedPayload;
use trackplan_core::resolve_event_payload;

/// Builds a versioned scope with one `v1` version and the given aliases.
fn scope_with_aliases(aliases: &[(&str, &str)]) -> NormalizedTargetPayload {
    let mut versions = BTreeMap::new();
    versions.insert(VersionKey::new("v1"), PayloadVersion::default());
    NormalizedTargetPayload::Versioned(VersionedPayload {
        current_ref: "v1".to_string(),
        aliases: aliases
            .iter()
            .map(|(name, target)| ((*name).to_string(), (*target).to_string()))
            .collect(),
        versions,
    })
}

#[test]
fn version_key_resolves_to_itself() {
    let scope = scope_with_aliases(&[]);
    let mut resolver = AliasResolver::for_scope(&scope);
    let mut issues = IssueList::new();

    let resolved = resolver.resolve("v1", &IssuePath::root(), &mut issues);

    assert_eq!(resolved, Some(VersionKey::new("v1")));
    assert!(issues.is_empty());
}

#[test]
fn direct_alias_matches_collapsed_two_hop_alias() {
    let direct = scope_with_aliases(&[("latest", "v1")]);
    let two_hop = scope_with_aliases(&[("latest", "stable"), ("stable", "v1")]);
    let mut issues = IssueList::new();

    let mut direct_resolver = AliasResolver::for_scope(&direct);
    let mut two_hop_resolver = AliasResolver::for_scope(&two_hop);
    let from_direct = direct_resolver.resolve("latest", &IssuePath::root(), &mut issues);
    let from_two_hop = two_hop_resolver.resolve("latest", &IssuePath::root(), &mut issues);

    assert_eq!(from_direct, Some(VersionKey::new("v1")));
    assert_eq!(from_direct, from_two_hop);
    assert!(issues.is_empty());
}

#[test]
fn dangling_alias_reports_once_and_yields_nothing() {
    let scope = scope_with_aliases(&[("latest", "missing")]);
    let mut resolver = AliasResolver::for_scope(&scope);
    let mut issues = IssueList::new();

    let first = resolver.resolve("latest", &IssuePath::root(), &mut issues);
    let second = resolver.resolve("latest", &IssuePath::root(), &mut issues);

    assert_eq!(first, None);
    assert_eq!(second, None);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues.entries()[0].message, "'missing' does not resolve to a version key");
}

/// Asserts that a cycle of the given length terminates with one issue.
fn assert_cycle_terminates(length: usize) {
    let names: Vec<String> = (0..length).map(|index| format!("alias{index}")).collect();
    let aliases: Vec<(&str, &str)> = (0..length)
        .map(|index| (names[index].as_str(), names[(index + 1) % length].as_str()))
        .collect();
    let scope = scope_with_aliases(&aliases);
    let mut resolver = AliasResolver::for_scope(&scope);
    let mut issues = IssueList::new();

    for name in &names {
        let resolved = resolver.resolve(name, &IssuePath::root(), &mut issues);
        assert_eq!(resolved, None);
    }

    let cycles: Vec<_> = issues
        .entries()
        .iter()
        .filter(|issue| issue.message.starts_with("Alias cycle detected"))
        .collect();
    assert_eq!(cycles.len(), 1, "cycle length {length}: {:?}", issues.entries());
}

#[test]
fn alias_cycle_of_length_two_terminates_with_one_issue() {
    assert_cycle_terminates(2);
}

#[test]
fn alias_cycle_of_length_three_terminates_with_one_issue() {
    assert_cycle_terminates(3);
}

#[test]
fn alias_cycle_of_length_fifty_terminates_with_one_issue() {
    assert_cycle_terminates(50);
}

#[test]
fn unresolved_alias_is_omitted_from_resolved_output() {
    let spec = ResolutionSpec {
        targets: TargetTable {
            all: vec![TargetId::new("web")],
            groups: [(SelectorName::new("all"), vec![TargetId::new("web")])].into(),
        },
        baseline: trackplan_core::SpecBaseline::default(),
    };
    let raw = json!({
        "all": {
            "current": "v1",
            "latest": "missing",
            "v1": {"schema": {"user_id": {"type": "string"}}},
        },
    });

    let result = resolve_event_payload(&spec, &raw);

    let web = result.payload.target(&TargetId::new("web")).expect("web resolved");
    assert!(web.aliases.is_empty());
    assert_eq!(web.current, VersionKey::new("v1"));
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].path, "payload.all.latest");
}

#[test]
fn alias_cycle_in_event_payload_reports_one_issue() {
    let spec = ResolutionSpec {
        targets: TargetTable {
            all: vec![TargetId::new("web")],
            groups: [(SelectorName::new("all"), vec![TargetId::new("web")])].into(),
        },
        baseline: trackplan_core::SpecBaseline::default(),
    };
    let raw = json!({
        "all": {
            "current": "v1",
            "a": "b",
            "b": "a",
            "v1": {"schema": {"user_id": {"type": "string"}}},
        },
    });

    let result = resolve_event_payload(&spec, &raw);

    let cycles: Vec<_> = result
        .issues
        .iter()
        .filter(|issue| issue.message.starts_with("Alias cycle detected"))
        .collect();
    assert_eq!(cycles.len(), 1, "issues: {:?}", result.issues);
    let web = result.payload.target(&TargetId::new("web")).expect("web resolved");
    assert!(web.aliases.is_empty());
}
