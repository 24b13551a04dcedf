//! JSON Patch apply logic.
//!
//! Every operation mutates the working document in place and reports a
//! [`Change`]; the batch entry points work on a private clone so the
//! caller's document is never touched and nothing partial escapes a failure.

use serde_json::Value;
use tracing::debug;

use patchview_json_pointer::{format_json_pointer, join_path, resolve_parent_mut, resolve_value};

use super::codec::{from_json, to_json};
use super::types::{ApplyError, Change, Op, Path, PatchError, PatchResult, PathStep};
use crate::json_equal::deep_equal;

fn not_found(path: &[PathStep]) -> PatchError {
    PatchError::PathNotFound {
        path: join_path(path),
    }
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(doc: &mut Value, path: &[PathStep], value: Value) -> Result<Change, PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        *doc = value.clone();
        return Ok(Change::add(Vec::new(), value, None));
    };
    let parent = resolve_parent_mut(doc, path)?;
    match parent {
        Value::Array(arr) => {
            let idx = match key {
                PathStep::Append => arr.len(),
                PathStep::Index(idx) => *idx,
                PathStep::Key(_) => return Err(not_found(path)),
            };
            if idx > arr.len() {
                return Err(PatchError::IndexOutOfBounds {
                    index: idx,
                    len: arr.len(),
                });
            }
            arr.insert(idx, value.clone());
            let mut actual: Path = parent_path.to_vec();
            actual.push(PathStep::Index(idx));
            Ok(Change::add(actual, value, Some(idx)))
        }
        // Overwrites an existing member; still recorded as an add.
        Value::Object(map) => {
            map.insert(key.as_key().into_owned(), value.clone());
            Ok(Change::add(path.to_vec(), value, None))
        }
        _ => Err(not_found(path)),
    }
}

fn remove_at(doc: &mut Value, path: &[PathStep]) -> Result<Value, PatchError> {
    let Some((key, _)) = path.split_last() else {
        return Err(not_found(path));
    };
    let parent = resolve_parent_mut(doc, path)?;
    match parent {
        Value::Array(arr) => match key.as_index() {
            Some(idx) if idx < arr.len() => Ok(arr.remove(idx)),
            _ => Err(not_found(path)),
        },
        Value::Object(map) => map
            .shift_remove(key.as_key().as_ref())
            .ok_or_else(|| not_found(path)),
        _ => Err(not_found(path)),
    }
}

fn apply_remove(doc: &mut Value, path: &[PathStep]) -> Result<Change, PatchError> {
    let old = remove_at(doc, path)?;
    Ok(Change::remove(path.to_vec(), old))
}

fn apply_replace(doc: &mut Value, path: &[PathStep], value: Value) -> Result<Change, PatchError> {
    let slot = match path.split_last() {
        None => doc,
        Some((key, _)) => {
            let parent = resolve_parent_mut(doc, path)?;
            let slot = match parent {
                Value::Array(arr) => match key.as_index() {
                    Some(idx) => arr.get_mut(idx),
                    None => None,
                },
                Value::Object(map) => map.get_mut(key.as_key().as_ref()),
                _ => None,
            };
            slot.ok_or_else(|| not_found(path))?
        }
    };
    let old = std::mem::replace(slot, value.clone());
    Ok(Change::replace(path.to_vec(), old, value))
}

fn apply_copy(doc: &mut Value, path: &[PathStep], from: &[PathStep]) -> Result<Change, PatchError> {
    let src = resolve_value(doc, from)?.clone();
    apply_add(doc, path, src)
}

/// Removes `from` before adding at `path`: when the add fails the working
/// document has already lost the source value.
fn apply_move(doc: &mut Value, path: &[PathStep], from: &[PathStep]) -> Result<Change, PatchError> {
    resolve_value(doc, from)?;
    let value = remove_at(doc, from)?;
    apply_add(doc, path, value)
}

fn apply_test(doc: &Value, path: &[PathStep], value: &Value) -> Result<(), PatchError> {
    let actual = resolve_value(doc, path)?;
    if deep_equal(actual, value) {
        Ok(())
    } else {
        Err(PatchError::AssertionFailed {
            expected: value.clone(),
            actual: actual.clone(),
        })
    }
}

// ── Main apply functions ──────────────────────────────────────────────────

/// Apply a single operation to the document (in-place mutation).
///
/// Returns the change record, or `None` for `test`.
///
/// # Errors
///
/// The operation's [`PatchError`]; the document may be partially modified
/// only by a failed `move`.
pub fn apply_op(doc: &mut Value, op: &Op) -> Result<Option<Change>, PatchError> {
    match op {
        Op::Add { path, value } => apply_add(doc, path, value.clone()).map(Some),
        Op::Remove { path } => apply_remove(doc, path).map(Some),
        Op::Replace { path, value } => apply_replace(doc, path, value.clone()).map(Some),
        Op::Copy { path, from } => apply_copy(doc, path, from).map(Some),
        Op::Move { path, from } => apply_move(doc, path, from).map(Some),
        Op::Test { path, value } => {
            apply_test(doc, path, value)?;
            Ok(None)
        }
    }
}

fn apply_step(doc: &mut Value, op: &Op, changes: &mut Vec<Change>) -> Result<(), PatchError> {
    debug!(
        op = op.op_name(),
        path = %format_json_pointer(op.path()),
        "applying operation"
    );
    changes.extend(apply_op(doc, op)?);
    Ok(())
}

/// Apply a sequence of operations to a clone of `original`.
///
/// # Errors
///
/// The first failing operation, quoted as JSON, with its cause. No partial
/// document or change list is returned.
pub fn apply_ops(original: &Value, ops: &[Op]) -> Result<PatchResult, ApplyError> {
    let mut doc = original.clone();
    let mut changes = Vec::with_capacity(ops.len());
    for op in ops {
        apply_step(&mut doc, op, &mut changes).map_err(|source| {
            debug!(%source, "patch batch failed");
            ApplyError {
                op: to_json(op),
                source,
            }
        })?;
    }
    Ok(PatchResult { doc, changes })
}

/// Apply a JSON Patch array, given as JSON, to a clone of `original`.
///
/// Each element is decoded right before it is applied, so a malformed or
/// unknown operation fails the batch at its position and is quoted
/// literally in the error.
pub fn apply_json_patch(original: &Value, patch: &Value) -> Result<PatchResult, ApplyError> {
    let raw_ops = patch.as_array().ok_or_else(|| ApplyError {
        op: patch.clone(),
        source: PatchError::InvalidOperation("patch must be an array".into()),
    })?;
    let mut doc = original.clone();
    let mut changes = Vec::with_capacity(raw_ops.len());
    for raw in raw_ops {
        from_json(raw)
            .and_then(|op| apply_step(&mut doc, &op, &mut changes))
            .map_err(|source| {
                debug!(%source, "patch batch failed");
                ApplyError {
                    op: raw.clone(),
                    source,
                }
            })?;
    }
    Ok(PatchResult { doc, changes })
}

// ── Tests ─────────────────────────────────────────────────────────────────
