// crates/trackplan-config/src/event.rs
// ============================================================================
// Module: Event File Loader
// Description: Event-file loading and taxonomy extraction from file paths.
// Purpose: Hand the resolution engine a raw payload tree per tracked event.
// Dependencies: serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Event files are YAML documents declaring one tracked event each: an
//! optional description plus the raw payload declaration the resolution
//! engine classifies. The event name is derived from the file stem, so the
//! directory layout is the taxonomy. The loader performs no structural
//! validation beyond the document envelope; payload shape diagnostics belong
//! to the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Event Model
// ============================================================================

/// One loaded event file.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFile {
    /// Event name derived from the file stem.
    pub name: String,
    /// Source path the event was loaded from.
    pub path: PathBuf,
    /// Optional author-facing description.
    pub description: Option<String>,
    /// Raw payload declaration, exactly as written by the event author.
    pub payload: Value,
}

/// Event document envelope as authored on disk.
#[derive(Debug, Deserialize)]
struct EventDocument {
    /// Optional author-facing description.
    #[serde(default)]
    description: Option<String>,
    /// Raw payload declaration.
    payload: Value,
}

// ============================================================================
// SECTION: Event Loading
// ============================================================================

/// Loads one event file.
///
/// # Errors
///
/// Returns [`EventError`] when the file cannot be read, parsed, or carries
/// no usable event name.
pub fn load_event_file(path: &Path) -> Result<EventFile, EventError> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| EventError::InvalidName(path.display().to_string()))?
        .to_string();
    let text = fs::read_to_string(path)
        .map_err(|err| EventError::Io(path.display().to_string(), err.to_string()))?;
    let document: EventDocument = serde_yaml::from_str(&text)
        .map_err(|err| EventError::Parse(path.display().to_string(), err.to_string()))?;
    Ok(EventFile {
        name,
        path: path.to_path_buf(),
        description: document.description,
        payload: document.payload,
    })
}

/// Loads every event file under a directory, recursively.
///
/// Files with a `.yaml` or `.yml` extension are loaded in deterministic path
/// order; other files are ignored.
///
/// # Errors
///
/// Returns [`EventError`] when the directory cannot be walked or any event
/// file fails to load.
pub fn load_events_dir(dir: &Path) -> Result<Vec<EventFile>, EventError> {
    let mut paths = Vec::new();
    collect_event_paths(dir, &mut paths)?;
    paths.sort();
    paths.iter().map(|path| load_event_file(path)).collect()
}

/// Walks a directory tree and collects event file paths.
fn collect_event_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), EventError> {
    let entries = fs::read_dir(dir)
        .map_err(|err| EventError::Io(dir.display().to_string(), err.to_string()))?;
    for entry in entries {
        let entry =
            entry.map_err(|err| EventError::Io(dir.display().to_string(), err.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_event_paths(&path, out)?;
            continue;
        }
        let is_event = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_event {
            out.push(path);
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Event-file loading errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EventError {
    /// Event file or directory could not be read.
    #[error("event io error for {0}: {1}")]
    Io(String, String),
    /// Event file could not be parsed as a YAML event document.
    #[error("event parse error for {0}: {1}")]
    Parse(String, String),
    /// Event file path yields no usable event name.
    #[error("event file has no usable name: {0}")]
    InvalidName(String),
}
