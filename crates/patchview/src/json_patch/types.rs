//! Core types for the JSON Patch module.

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use patchview_json_pointer::{format_json_pointer, JsonPointerError};
pub use patchview_json_pointer::{Path, PathStep};

// ── Errors ────────────────────────────────────────────────────────────────

/// Failure of a single operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
    #[error("Path not found: {path}")]
    PathNotFound { path: String },
    #[error("Index out of bounds: {index} (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Test failed: expected {expected}, got {actual}")]
    AssertionFailed { expected: Value, actual: Value },
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<JsonPointerError> for PatchError {
    fn from(err: JsonPointerError) -> Self {
        match err {
            JsonPointerError::NotFound { path } => PatchError::PathNotFound { path },
        }
    }
}

/// Failure of a patch batch: the offending operation, as JSON, and why it
/// failed.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Failed to apply patch {op}: {source}")]
pub struct ApplyError {
    pub op: Value,
    #[source]
    pub source: PatchError,
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// A JSON Patch operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add { path: Path, value: Value },
    Remove { path: Path },
    Replace { path: Path, value: Value },
    Copy { path: Path, from: Path },
    Move { path: Path, from: Path },
    Test { path: Path, value: Value },
}

impl Op {
    /// Returns the operation name as it appears in the `op` member.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Copy { .. } => "copy",
            Op::Move { .. } => "move",
            Op::Test { .. } => "test",
        }
    }

    /// Returns the target path of the operation.
    pub fn path(&self) -> &Path {
        match self {
            Op::Add { path, .. }
            | Op::Remove { path }
            | Op::Replace { path, .. }
            | Op::Copy { path, .. }
            | Op::Move { path, .. }
            | Op::Test { path, .. } => path,
        }
    }
}

// ── Change records ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Remove,
    Replace,
}

/// What one applied operation did to the document.
///
/// `copy` and `move` are recorded as the `add` they resolve to. For an `add`
/// into an array, `path` ends in the concrete insertion index, never in the
/// append token, and `index` repeats that position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(serialize_with = "serialize_path")]
    pub path: Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(rename = "oldValue", skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Change {
    pub fn add(path: Path, value: Value, index: Option<usize>) -> Self {
        Self {
            kind: ChangeKind::Add,
            path,
            value: Some(value),
            old_value: None,
            index,
        }
    }

    pub fn remove(path: Path, old_value: Value) -> Self {
        Self {
            kind: ChangeKind::Remove,
            path,
            value: None,
            old_value: Some(old_value),
            index: None,
        }
    }

    pub fn replace(path: Path, old_value: Value, value: Value) -> Self {
        Self {
            kind: ChangeKind::Replace,
            path,
            value: Some(value),
            old_value: Some(old_value),
            index: None,
        }
    }
}

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_json_pointer(path))
}

// ── Result types ──────────────────────────────────────────────────────────

/// Result of applying a full patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchResult {
    /// The patched copy of the document.
    pub doc: Value,
    /// One record per applied non-`test` operation, in order.
    pub changes: Vec<Change>,
}
