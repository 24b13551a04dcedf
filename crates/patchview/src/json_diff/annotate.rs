use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

use patchview_json_pointer::{get, join_path};

use super::{AnnotatedLine, LineType};
use crate::json_patch::{Change, ChangeKind, Path, PathStep};

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn comma(is_last: bool) -> &'static str {
    if is_last {
        ""
    } else {
        ","
    }
}

fn key_json(key: &str) -> String {
    Value::String(key.to_string()).to_string()
}

/// Annotate `patched` line by line.
///
/// Lines follow document order: container open, members or elements,
/// container close, two spaces of indentation per depth. Scalar lines carry
/// compact JSON. Changes are matched to lines by their `/`-joined path; for
/// repeated paths the last record wins. Every container of `patched` is
/// compared with the value at the same path of `original`, when there is
/// one, to surface removed object members and truncated arrays.
///
/// ```
/// use patchview::json_diff::{annotate, LineType};
/// use patchview::json_patch::apply_json_patch;
/// use serde_json::json;
///
/// let original = json!({"age": 30});
/// let patch = json!([{"op": "replace", "path": "/age", "value": 31}]);
/// let result = apply_json_patch(&original, &patch).unwrap();
/// let lines = annotate(&original, &result.doc, &result.changes);
///
/// let types: Vec<_> = lines.iter().map(|l| l.line_type).collect();
/// assert_eq!(
///     types,
///     [LineType::Unchanged, LineType::Removed, LineType::Added, LineType::Unchanged]
/// );
/// assert_eq!(lines[2].content, r#"  "age": 31"#);
/// ```
pub fn annotate(original: &Value, patched: &Value, changes: &[Change]) -> Vec<AnnotatedLine> {
    let mut annotator = Annotator {
        original,
        changes: changes.iter().map(|c| (join_path(&c.path), c)).collect(),
        lines: Vec::new(),
    };
    let mut path = Path::new();
    match patched {
        Value::Array(_) | Value::Object(_) => annotator.node(patched, &mut path),
        scalar => annotator.root_scalar(scalar),
    }
    trace!(
        lines = annotator.lines.len(),
        changes = changes.len(),
        "annotated patched document"
    );
    annotator.lines
}

struct Annotator<'a> {
    original: &'a Value,
    changes: IndexMap<String, &'a Change>,
    lines: Vec<AnnotatedLine>,
}

impl<'a> Annotator<'a> {
    fn push(&mut self, line_type: LineType, content: String) {
        self.lines.push(AnnotatedLine::new(line_type, content));
    }

    fn change_kind(&self, path: &[PathStep]) -> Option<ChangeKind> {
        self.change(path).map(|c| c.kind)
    }

    fn change(&self, path: &[PathStep]) -> Option<&'a Change> {
        self.changes.get(&join_path(path)).copied()
    }

    fn original_at(&self, path: &[PathStep]) -> Option<&'a Value> {
        get(self.original, path)
    }

    fn node(&mut self, value: &Value, path: &mut Path) {
        match value {
            Value::Array(items) => self.array(items, path),
            Value::Object(map) => self.object(map, path),
            scalar => {
                let line = format!("{}{scalar}", indent(path.len()));
                self.push(LineType::Unchanged, line);
            }
        }
    }

    fn root_scalar(&mut self, value: &Value) {
        match self.change(&[]) {
            Some(change) if change.kind == ChangeKind::Replace => {
                let old = change.old_value.clone().unwrap_or(Value::Null);
                self.push(LineType::Removed, old.to_string());
                self.push(LineType::Added, value.to_string());
            }
            Some(change) if change.kind == ChangeKind::Add => {
                self.push(LineType::Added, value.to_string());
            }
            _ => self.push(LineType::Unchanged, value.to_string()),
        }
    }

    fn close(&mut self, bracket: char, depth: usize) {
        let suffix = if depth > 0 { "," } else { "" };
        self.push(LineType::Unchanged, format!("{}{bracket}{suffix}", indent(depth)));
    }

    fn array(&mut self, items: &[Value], path: &mut Path) {
        let depth = path.len();
        let pad = indent(depth);
        self.push(LineType::Unchanged, format!("{pad}["));

        let original = match self.original_at(path) {
            Some(Value::Array(orig)) => Some(orig),
            _ => None,
        };

        for (idx, item) in items.iter().enumerate() {
            path.push(PathStep::Index(idx));
            match item {
                Value::Array(_) | Value::Object(_) => self.node(item, path),
                scalar => {
                    let is_new = self.change_kind(path) == Some(ChangeKind::Add)
                        || original.is_some_and(|orig| idx >= orig.len());
                    let line_type = if is_new {
                        LineType::Added
                    } else {
                        LineType::Unchanged
                    };
                    let is_last = idx + 1 == items.len();
                    self.push(line_type, format!("{pad}  {scalar}{}", comma(is_last)));
                }
            }
            path.pop();
        }

        // Elements past the end of the patched array were dropped.
        if let Some(orig) = original {
            for removed in orig.iter().skip(items.len()) {
                self.push(LineType::Removed, format!("{pad}  {removed},"));
            }
        }

        self.close(']', depth);
    }

    fn object(&mut self, map: &Map<String, Value>, path: &mut Path) {
        let depth = path.len();
        let pad = indent(depth);
        self.push(LineType::Unchanged, format!("{pad}{{"));

        for (idx, (key, value)) in map.iter().enumerate() {
            let is_last = idx + 1 == map.len();
            path.push(PathStep::Key(key.clone()));
            let change = self.change(path);
            let name = key_json(key);
            match value {
                Value::Array(_) | Value::Object(_) => {
                    let key_line = format!("{pad}  {name}:");
                    if change.is_some_and(|c| c.kind == ChangeKind::Add) {
                        self.push(LineType::Added, key_line);
                        self.subtree(value, path.len(), LineType::Added);
                    } else {
                        self.push(LineType::Unchanged, key_line);
                        self.node(value, path);
                    }
                }
                scalar => {
                    let line = format!("{pad}  {name}: {scalar}{}", comma(is_last));
                    match change {
                        Some(c) if c.kind == ChangeKind::Replace => {
                            let old = c.old_value.clone().unwrap_or(Value::Null);
                            self.push(LineType::Removed, format!("{pad}  {name}: {old},"));
                            self.push(LineType::Added, line);
                        }
                        Some(c) if c.kind == ChangeKind::Add => self.push(LineType::Added, line),
                        _ => self.push(LineType::Unchanged, line),
                    }
                }
            }
            path.pop();
        }

        // Members of the original object that a `remove` took away.
        if let Some(Value::Object(orig)) = self.original_at(path) {
            for (key, removed) in orig {
                if map.contains_key(key) {
                    continue;
                }
                path.push(PathStep::Key(key.clone()));
                if self.change_kind(path) == Some(ChangeKind::Remove) {
                    let name = key_json(key);
                    self.push(LineType::Removed, format!("{pad}  {name}: {removed},"));
                }
                path.pop();
            }
        }

        self.close('}', depth);
    }

    /// Emit the pretty-printed `value`, every line tagged `line_type`.
    fn subtree(&mut self, value: &Value, depth: usize, line_type: LineType) {
        let pad = indent(depth);
        let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        let mut lines = pretty.lines().peekable();
        while let Some(line) = lines.next() {
            // Match the trailing comma the generic path puts on nested closers.
            let suffix = if lines.peek().is_none() { "," } else { "" };
            self.push(line_type, format!("{pad}{line}{suffix}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_patch::apply_json_patch;
    use serde_json::json;

    fn run(original: Value, patch: Value) -> Vec<(LineType, String)> {
        let result = apply_json_patch(&original, &patch).unwrap();
        annotate(&original, &result.doc, &result.changes)
            .into_iter()
            .map(|l| (l.line_type, l.content))
            .collect()
    }

    fn u(s: &str) -> (LineType, String) {
        (LineType::Unchanged, s.to_string())
    }
    fn a(s: &str) -> (LineType, String) {
        (LineType::Added, s.to_string())
    }
    fn r(s: &str) -> (LineType, String) {
        (LineType::Removed, s.to_string())
    }

    #[test]
    fn unchanged_document() {
        let lines = run(json!({"a": 1, "b": [true, null]}), json!([]));
        assert_eq!(
            lines,
            vec![
                u("{"),
                u(r#"  "a": 1,"#),
                u(r#"  "b":"#),
                u("  ["),
                u("    true,"),
                u("    null"),
                u("  ],"),
                u("}"),
            ]
        );
    }

    #[test]
    fn replace_and_remove_scalar_members() {
        let lines = run(
            json!({"age": 30, "city": "NY"}),
            json!([
                {"op": "replace", "path": "/age", "value": 31},
                {"op": "remove", "path": "/city"}
            ]),
        );
        assert_eq!(
            lines,
            vec![
                u("{"),
                r(r#"  "age": 30,"#),
                a(r#"  "age": 31"#),
                r(r#"  "city": "NY","#),
                u("}"),
            ]
        );
    }

    #[test]
    fn appended_element_is_added() {
        let lines = run(
            json!({"hobbies": ["a", "b"]}),
            json!([{"op": "add", "path": "/hobbies/-", "value": "c"}]),
        );
        assert_eq!(
            lines,
            vec![
                u("{"),
                u(r#"  "hobbies":"#),
                u("  ["),
                u(r#"    "a","#),
                u(r#"    "b","#),
                a(r#"    "c""#),
                u("  ],"),
                u("}"),
            ]
        );
    }

    #[test]
    fn inserted_element_and_overflow_read_as_added() {
        let lines = run(json!([1, 2]), json!([{"op": "add", "path": "/0", "value": 0}]));
        // Index 2 is past the original length, so it reads as new as well.
        assert_eq!(lines, vec![u("["), a("  0,"), u("  1,"), a("  2"), u("]")]);
    }

    #[test]
    fn truncated_array_lists_trailing_removals() {
        let lines = run(
            json!({"list": [1, 2, 3]}),
            json!([{"op": "remove", "path": "/list/0"}]),
        );
        assert_eq!(
            lines,
            vec![
                u("{"),
                u(r#"  "list":"#),
                u("  ["),
                u("    2,"),
                u("    3"),
                r("    3,"),
                u("  ],"),
                u("}"),
            ]
        );
    }

    #[test]
    fn added_container_member_is_added_wholesale() {
        let lines = run(
            json!({"a": 1}),
            json!([{"op": "add", "path": "/obj", "value": {"x": [1], "y": "z"}}]),
        );
        assert_eq!(
            lines,
            vec![
                u("{"),
                u(r#"  "a": 1,"#),
                a(r#"  "obj":"#),
                a("  {"),
                a(r#"    "x": ["#),
                a("      1"),
                a("    ],"),
                a(r#"    "y": "z""#),
                a("  },"),
                u("}"),
            ]
        );
    }

    #[test]
    fn nested_changes_use_full_paths() {
        let lines = run(
            json!({"address": {"street": "123 Main St", "zip": "10001", "unit": 4}}),
            json!([
                {"op": "replace", "path": "/address/street", "value": "456 Oak Ave"},
                {"op": "remove", "path": "/address/unit"}
            ]),
        );
        assert_eq!(
            lines,
            vec![
                u("{"),
                u(r#"  "address":"#),
                u("  {"),
                r(r#"    "street": "123 Main St","#),
                a(r#"    "street": "456 Oak Ave","#),
                u(r#"    "zip": "10001""#),
                r(r#"    "unit": 4,"#),
                u("  },"),
                u("}"),
            ]
        );
    }

    #[test]
    fn container_key_line_keeps_colon() {
        let lines = run(json!({"outer": {"inner": [1]}}), json!([]));
        assert_eq!(lines[1], u(r#"  "outer":"#));
        assert_eq!(lines[3], u(r#"    "inner":"#));
        assert_eq!(lines[4], u("    ["));
    }

    #[test]
    fn removed_member_without_record_is_not_shown() {
        let original = json!({"a": 1, "b": 2});
        let patched = json!({"a": 1});
        let lines = annotate(&original, &patched, &[]);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.line_type == LineType::Unchanged));
    }

    #[test]
    fn keys_are_json_escaped() {
        let lines = run(
            json!({}),
            json!([{"op": "add", "path": "/say \"hi\"", "value": "a\nb"}]),
        );
        assert_eq!(lines[1], a(r#"  "say \"hi\"": "a\nb""#));
    }

    #[test]
    fn scalar_root() {
        assert_eq!(run(json!(1), json!([])), vec![u("1")]);
        assert_eq!(
            run(json!(1), json!([{"op": "replace", "path": "", "value": "x"}])),
            vec![r("1"), a(r#""x""#)]
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(run(json!({}), json!([])), vec![u("{"), u("}")]);
        assert_eq!(
            run(json!({"a": []}), json!([])),
            vec![u("{"), u(r#"  "a":"#), u("  ["), u("  ],"), u("}")]
        );
    }

    #[test]
    fn last_record_for_a_path_wins() {
        let lines = run(
            json!({"n": 1}),
            json!([
                {"op": "replace", "path": "/n", "value": 2},
                {"op": "add", "path": "/n", "value": 3}
            ]),
        );
        assert_eq!(lines, vec![u("{"), a(r#"  "n": 3"#), u("}")]);
    }
}
