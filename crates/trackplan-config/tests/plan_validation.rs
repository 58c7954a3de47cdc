// crates/trackplan-config/tests/plan_validation.rs
// ============================================================================
// Module: Plan Validation Tests
// Description: Load-time invariant checks for tracking-plan specifications.
// Purpose: Ensure malformed plans are rejected before resolution.
// Dependencies: trackplan-config, trackplan-core
// ============================================================================

//! Validation behavior tests for the tracking-plan model.

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

use trackplan_config::PlanError;
use trackplan_config::TrackingPlan;

/// Parses a plan from inline YAML without validating it.
fn plan_from_yaml(text: &str) -> TrackingPlan {
    serde_yaml::from_str(text).expect("plan parses")
}

#[test]
fn valid_plan_passes_validation() {
    let plan = plan_from_yaml(
        r"
targets:
  all: [web, ios, android]
  groups:
    mobile: [ios, android]
defaults:
  global:
    app_id: {type: string, required: true}
  overrides:
    ios:
      idfa: {type: string}
dicts:
  colors: [red, blue]
",
    );

    assert!(plan.validate().is_ok());
}

#[test]
fn empty_target_list_is_rejected() {
    let plan = plan_from_yaml("targets:\n  all: []\n");

    assert!(matches!(plan.validate(), Err(PlanError::MissingTargets)));
}

#[test]
fn duplicate_target_is_rejected() {
    let plan = plan_from_yaml("targets:\n  all: [web, ios, web]\n");

    let Err(PlanError::DuplicateTarget(target)) = plan.validate() else {
        panic!("expected duplicate target error");
    };
    assert_eq!(target, "web");
}

#[test]
fn group_with_unknown_member_is_rejected() {
    let plan = plan_from_yaml(
        r"
targets:
  all: [web]
  groups:
    mobile: [ios]
",
    );

    let Err(PlanError::UnknownGroupMember(group, member)) = plan.validate() else {
        panic!("expected unknown group member error");
    };
    assert_eq!(group, "mobile");
    assert_eq!(member, "ios");
}

#[test]
fn group_shadowing_a_target_is_rejected() {
    let plan = plan_from_yaml(
        r"
targets:
  all: [web, ios]
  groups:
    ios: [ios]
",
    );

    assert!(matches!(plan.validate(), Err(PlanError::GroupShadowsTarget(_))));
}

#[test]
fn override_for_unknown_target_is_rejected() {
    let plan = plan_from_yaml(
        r"
targets:
  all: [web]
defaults:
  overrides:
    ios:
      idfa: {type: string}
",
    );

    let Err(PlanError::UnknownOverrideTarget(target)) = plan.validate() else {
        panic!("expected unknown override target error");
    };
    assert_eq!(target, "ios");
}

#[test]
fn field_with_two_selection_mechanisms_is_rejected() {
    let plan = plan_from_yaml(
        r#"
targets:
  all: [web]
defaults:
  global:
    color: {enum: [red], value: "red"}
"#,
    );

    let Err(PlanError::AmbiguousSelection(field)) = plan.validate() else {
        panic!("expected ambiguous selection error");
    };
    assert_eq!(field, "color");
}

#[test]
fn contradictory_baseline_field_is_rejected() {
    let plan = plan_from_yaml(
        r"
targets:
  all: [web]
defaults:
  global:
    app_id: {required: false, valueRequired: true}
",
    );

    assert!(matches!(plan.validate(), Err(PlanError::ContradictoryField(_))));
}

#[test]
fn unknown_dictionary_reference_is_rejected() {
    let plan = plan_from_yaml(
        r"
targets:
  all: [web]
defaults:
  global:
    color: {dict: colors}
",
    );

    let Err(PlanError::UnknownDictionary(field, dict)) = plan.validate() else {
        panic!("expected unknown dictionary error");
    };
    assert_eq!(field, "color");
    assert_eq!(dict, "colors");
}

#[test]
fn resolution_spec_carries_targets_and_baseline() {
    let plan = plan_from_yaml(
        r"
targets:
  all: [web, ios]
  groups:
    mobile: [ios]
defaults:
  global:
    app_id: {type: string, required: true}
",
    );

    let spec = plan.resolution_spec();

    assert_eq!(spec.targets.all.len(), 2);
    assert_eq!(spec.targets.groups.len(), 1);
    assert_eq!(spec.baseline.global.len(), 1);
}
