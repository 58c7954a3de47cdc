// crates/trackplan-core/src/core/issue.rs
// ============================================================================
// Module: Trackplan Resolution Issues
// Description: Non-fatal diagnostics accumulated throughout a resolution run.
// Purpose: Report every defect found in one pass instead of failing on the first.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The engine never throws for data-shape problems. Every failure degrades
//! the failing unit to an empty or omitted result and records one
//! [`PayloadIssue`] naming the location and the defect. The caller attaches
//! severity and aggregates issues with other validation errors; severity for
//! resolution issues is always "error", so no tier is carried here.
//!
//! Paths use dotted notation rooted at `payload`
//! (e.g. `payload.web.v2.$ref`), so callers can point at the offending
//! declaration without re-deriving location.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Issue Types
// ============================================================================

/// One non-fatal diagnostic produced during payload resolution.
///
/// # Invariants
/// - `path` is rooted at `payload` and names the declaration the issue is
///   about, not the unit that was dropped because of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadIssue {
    /// Dotted path to the offending declaration.
    pub path: String,
    /// Human-readable description of the defect.
    pub message: String,
}

impl fmt::Display for PayloadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

// ============================================================================
// SECTION: Issue Path
// ============================================================================

/// Dotted path builder for issue locations.
///
/// # Invariants
/// - Resolution issues are rooted at `payload`; downstream consumers may
///   root their own paths (e.g. at a data object) via [`IssuePath::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuePath(String);

impl IssuePath {
    /// Returns the resolution root path (`payload`).
    #[must_use]
    pub fn root() -> Self {
        Self("payload".to_string())
    }

    /// Creates a path with a caller-chosen root segment.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    /// Returns a new path with a dotted segment appended.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        Self(format!("{}.{segment}", self.0))
    }

    /// Returns a new path with a bracketed index appended.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Issue List
// ============================================================================

/// Accumulator threaded through every resolution stage.
///
/// Issue order follows the deterministic traversal order of the resolver, so
/// identical inputs yield identical issue lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueList {
    /// Collected issues in traversal order.
    entries: Vec<PayloadIssue>,
}

impl IssueList {
    /// Creates an empty issue list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records one issue at the given path.
    pub fn push(&mut self, path: &IssuePath, message: impl Into<String>) {
        self.entries.push(PayloadIssue {
            path: path.as_str().to_string(),
            message: message.into(),
        });
    }

    /// Returns the collected issues.
    #[must_use]
    pub fn entries(&self) -> &[PayloadIssue] {
        &self.entries
    }

    /// Returns true when no issue was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of recorded issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Consumes the list and returns the issues in traversal order.
    #[must_use]
    pub fn into_entries(self) -> Vec<PayloadIssue> {
        self.entries
    }
}
