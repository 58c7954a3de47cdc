// crates/trackplan-core/src/core/identifiers.rs
// ============================================================================
// Module: Trackplan Identifiers
// Description: Canonical opaque identifiers for tracking-plan payload scopes.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout the payload
//! resolution engine. Identifiers are opaque and serialize as plain strings
//! on the wire. No normalization or validation is applied at construction;
//! resolvability is checked by the resolver stages, not by these types.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reserved version key assigned to unversioned payloads.
///
/// The normalizer rejects authored version names beginning with `$`, so this
/// sentinel can never collide with a user-declared version key.
pub const DEFAULT_VERSION_KEY: &str = "$default";

/// Separator between a selector scope and a version name in cross-scope
/// `$ref` strings (`"<scope>::<name>"`).
pub const SCOPE_SEPARATOR: &str = "::";

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Concrete delivery target identifier (e.g. `"ios"`).
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Creates a new target identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TargetId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Selector name keying one payload declaration (e.g. `"all"`, `"mobile"`).
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorName(String);

impl SelectorName {
    /// Creates a new selector name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SelectorName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SelectorName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Version key naming one addressable schema snapshot within a scope.
///
/// # Invariants
/// - Opaque UTF-8 string; keys beginning with `$` are reserved for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionKey(String);

impl VersionKey {
    /// Creates a new version key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the reserved key for unversioned payloads.
    #[must_use]
    pub fn unversioned() -> Self {
        Self::new(DEFAULT_VERSION_KEY)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for VersionKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VersionKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Field name within a payload schema.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Creates a new field name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for FieldName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// External dictionary name referenced by a field (`dict`).
///
/// # Invariants
/// - Opaque UTF-8 string; resolvability against the plan's dictionary table is
///   checked by the downstream validator, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DictName(String);

impl DictName {
    /// Creates a new dictionary name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DictName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DictName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DictName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
