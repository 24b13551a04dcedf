//! JSON codec for JSON Patch operations.
//!
//! Converts operations to/from `serde_json::Value` in RFC 6902 format.

use serde_json::{json, Map, Value};

use patchview_json_pointer::{format_json_pointer, parse_json_pointer};

use crate::json_patch::types::{Op, Path, PatchError};

// ── Path helpers ──────────────────────────────────────────────────────────

fn encode_path(path: &Path) -> Value {
    Value::String(format_json_pointer(path))
}

fn decode_path(obj: &Map<String, Value>, key: &str, op: &str) -> Result<Path, PatchError> {
    let pointer = obj
        .get(key)
        .ok_or_else(|| PatchError::InvalidOperation(format!("{op} requires '{key}'")))?
        .as_str()
        .ok_or_else(|| PatchError::InvalidOperation(format!("'{key}' must be a string")))?;
    Ok(parse_json_pointer(pointer))
}

fn decode_value(obj: &Map<String, Value>, op: &str) -> Result<Value, PatchError> {
    obj.get("value")
        .cloned()
        .ok_or_else(|| PatchError::InvalidOperation(format!("{op} requires 'value'")))
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an `Op` to a `serde_json::Value` in the JSON Patch format.
pub fn to_json(op: &Op) -> Value {
    match op {
        Op::Add { path, value } => json!({
            "op": "add",
            "path": encode_path(path),
            "value": value
        }),
        Op::Remove { path } => json!({
            "op": "remove",
            "path": encode_path(path)
        }),
        Op::Replace { path, value } => json!({
            "op": "replace",
            "path": encode_path(path),
            "value": value
        }),
        Op::Copy { path, from } => json!({
            "op": "copy",
            "path": encode_path(path),
            "from": encode_path(from)
        }),
        Op::Move { path, from } => json!({
            "op": "move",
            "path": encode_path(path),
            "from": encode_path(from)
        }),
        Op::Test { path, value } => json!({
            "op": "test",
            "path": encode_path(path),
            "value": value
        }),
    }
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one JSON Patch operation.
///
/// # Errors
///
/// `UnknownOperation` for an unrecognized `op` tag, `InvalidOperation` when
/// the operation is not an object or lacks a member its kind requires.
pub fn from_json(v: &Value) -> Result<Op, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOperation("operation must be an object".into()))?;
    let op_str = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOperation("missing 'op' field".into()))?;

    match op_str {
        "add" => Ok(Op::Add {
            path: decode_path(obj, "path", op_str)?,
            value: decode_value(obj, op_str)?,
        }),
        "remove" => Ok(Op::Remove {
            path: decode_path(obj, "path", op_str)?,
        }),
        "replace" => Ok(Op::Replace {
            path: decode_path(obj, "path", op_str)?,
            value: decode_value(obj, op_str)?,
        }),
        "copy" => Ok(Op::Copy {
            path: decode_path(obj, "path", op_str)?,
            from: decode_path(obj, "from", op_str)?,
        }),
        "move" => Ok(Op::Move {
            path: decode_path(obj, "path", op_str)?,
            from: decode_path(obj, "from", op_str)?,
        }),
        "test" => Ok(Op::Test {
            path: decode_path(obj, "path", op_str)?,
            value: decode_value(obj, op_str)?,
        }),
        other => Err(PatchError::UnknownOperation(other.to_string())),
    }
}

/// Deserialize a JSON Patch array.
pub fn from_json_patch(v: &Value) -> Result<Vec<Op>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOperation("patch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_patch::types::PathStep;

    fn key(s: &str) -> PathStep {
        PathStep::Key(s.to_string())
    }

    #[test]
    fn decode_add_with_append_token() {
        let op = from_json(&json!({"op": "add", "path": "/hobbies/-", "value": "c"})).unwrap();
        assert_eq!(
            op,
            Op::Add {
                path: vec![key("hobbies"), PathStep::Append],
                value: json!("c"),
            }
        );
    }

    #[test]
    fn decode_move_reads_from() {
        let op = from_json(&json!({"op": "move", "from": "/a/0", "path": "/b"})).unwrap();
        assert_eq!(
            op,
            Op::Move {
                path: vec![key("b")],
                from: vec![key("a"), PathStep::Index(0)],
            }
        );
    }

    #[test]
    fn decode_null_value_is_present() {
        let op = from_json(&json!({"op": "replace", "path": "/a", "value": null})).unwrap();
        assert_eq!(
            op,
            Op::Replace {
                path: vec![key("a")],
                value: Value::Null,
            }
        );
    }

    #[test]
    fn unknown_op_tag() {
        let err = from_json(&json!({"op": "frobnicate", "path": "/a"})).unwrap_err();
        assert_eq!(err, PatchError::UnknownOperation("frobnicate".into()));
        assert_eq!(err.to_string(), "Unknown operation: frobnicate");
    }

    #[test]
    fn missing_members() {
        let cases = [
            json!({"path": "/a"}),
            json!({"op": "add", "path": "/a"}),
            json!({"op": "remove"}),
            json!({"op": "copy", "path": "/a"}),
            json!({"op": "test", "path": "/a"}),
            json!({"op": "remove", "path": 7}),
            json!("add"),
        ];
        for case in cases {
            assert!(
                matches!(from_json(&case), Err(PatchError::InvalidOperation(_))),
                "{case}"
            );
        }
    }

    #[test]
    fn patch_must_be_array() {
        let err = from_json_patch(&json!({"op": "add"})).unwrap_err();
        assert_eq!(err, PatchError::InvalidOperation("patch must be an array".into()));
    }

    #[test]
    fn encode_matches_input_form() {
        let input = json!([
            {"op": "add", "path": "/a~1b", "value": [1]},
            {"op": "remove", "path": "/x/0"},
            {"op": "copy", "path": "/y", "from": "/x"},
            {"op": "test", "path": "", "value": {}}
        ]);
        let ops = from_json_patch(&input).unwrap();
        assert_eq!(Value::Array(ops.iter().map(to_json).collect()), input);
    }
}
