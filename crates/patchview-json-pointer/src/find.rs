//! Resolution of path steps against JSON values.

use serde_json::Value;

use crate::types::PathStep;
use crate::{join_path, JsonPointerError};

fn child<'a>(val: &'a Value, step: &PathStep) -> Option<&'a Value> {
    match val {
        Value::Object(map) => map.get(step.as_key().as_ref()),
        Value::Array(arr) => step.as_index().and_then(|idx| arr.get(idx)),
        _ => None,
    }
}

fn child_mut<'a>(val: &'a mut Value, step: &PathStep) -> Option<&'a mut Value> {
    match val {
        Value::Object(map) => map.get_mut(step.as_key().as_ref()),
        Value::Array(arr) => step.as_index().and_then(|idx| arr.get_mut(idx)),
        _ => None,
    }
}

fn not_found(path: &[PathStep]) -> JsonPointerError {
    JsonPointerError::NotFound {
        path: join_path(path),
    }
}

/// Resolve the container that holds the last step of `path`.
///
/// Walks every step but the last. The root path resolves to `doc` itself.
///
/// # Errors
///
/// `NotFound` with the steps consumed up to and including the first one
/// that did not resolve.
///
/// ```
/// use patchview_json_pointer::{parse_json_pointer, resolve_parent};
/// use serde_json::json;
///
/// let doc = json!({"a": {"b": 1}});
/// let parent = resolve_parent(&doc, &parse_json_pointer("/a/b")).unwrap();
/// assert_eq!(parent, &json!({"b": 1}));
///
/// let err = resolve_parent(&doc, &parse_json_pointer("/x/y/z")).unwrap_err();
/// assert_eq!(err.to_string(), "Path not found: x");
/// ```
pub fn resolve_parent<'a>(doc: &'a Value, path: &[PathStep]) -> Result<&'a Value, JsonPointerError> {
    let Some((_, parents)) = path.split_last() else {
        return Ok(doc);
    };
    let mut current = doc;
    for (i, step) in parents.iter().enumerate() {
        current = child(current, step).ok_or_else(|| not_found(&path[..=i]))?;
    }
    Ok(current)
}

/// Mutable counterpart of [`resolve_parent`].
pub fn resolve_parent_mut<'a>(
    doc: &'a mut Value,
    path: &[PathStep],
) -> Result<&'a mut Value, JsonPointerError> {
    let Some((_, parents)) = path.split_last() else {
        return Ok(doc);
    };
    let mut current = doc;
    for (i, step) in parents.iter().enumerate() {
        current = match child_mut(current, step) {
            Some(next) => next,
            None => return Err(not_found(&path[..=i])),
        };
    }
    Ok(current)
}

/// Resolve the value at `path`.
///
/// # Errors
///
/// `NotFound` carrying the whole path when any step does not resolve.
pub fn resolve_value<'a>(doc: &'a Value, path: &[PathStep]) -> Result<&'a Value, JsonPointerError> {
    get(doc, path).ok_or_else(|| not_found(path))
}

/// Get the value at `path`, or `None` when any step is absent.
pub fn get<'a>(doc: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |current, step| child(current, step))
}
