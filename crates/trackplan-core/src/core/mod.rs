// crates/trackplan-core/src/core/mod.rs
// ============================================================================
// Module: Trackplan Core Types
// Description: Canonical payload, field, and target structures.
// Purpose: Provide stable, serializable types for payload resolution.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types define the shapes payload resolution operates on: opaque
//! identifiers, field schemas, normalized and resolved payloads, the plan's
//! target table, and the issue diagnostics accumulated during a run. These
//! types are the canonical source of truth for any derived surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod field;
pub mod identifiers;
pub mod issue;
pub mod payload;
pub mod targets;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use field::FieldSpec;
pub use field::FieldType;
pub use identifiers::DEFAULT_VERSION_KEY;
pub use identifiers::DictName;
pub use identifiers::FieldName;
pub use identifiers::SCOPE_SEPARATOR;
pub use identifiers::SelectorName;
pub use identifiers::TargetId;
pub use identifiers::VersionKey;
pub use issue::IssueList;
pub use issue::IssuePath;
pub use issue::PayloadIssue;
pub use payload::FieldMap;
pub use payload::NormalizedTargetPayload;
pub use payload::PayloadVersion;
pub use payload::ResolvedEventPayload;
pub use payload::ResolvedPayloadVersion;
pub use payload::ResolvedTargetPayload;
pub use payload::VersionedPayload;
pub use targets::ResolutionSpec;
pub use targets::SpecBaseline;
pub use targets::TargetTable;
