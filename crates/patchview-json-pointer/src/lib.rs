//! JSON Pointer (RFC 6901) utilities.
//!
//! Parses pointer strings into typed path steps and resolves those steps
//! against `serde_json` values.
//!
//! # Example
//!
//! ```
//! use patchview_json_pointer::{parse_json_pointer, format_json_pointer, resolve_value, PathStep};
//!
//! let path = parse_json_pointer("/foo/0");
//! assert_eq!(path, vec![PathStep::Key("foo".into()), PathStep::Index(0)]);
//! assert_eq!(format_json_pointer(&path), "/foo/0");
//!
//! let doc = serde_json::json!({"foo": [42]});
//! assert_eq!(resolve_value(&doc, &path).unwrap(), &serde_json::json!(42));
//! ```

use thiserror::Error;

pub mod find;
pub mod types;

pub use find::{get, resolve_parent, resolve_parent_mut, resolve_value};
pub use types::{Path, PathStep};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    /// `path` is the portion of the path consumed when the lookup failed,
    /// joined with [`join_path`].
    #[error("Path not found: {path}")]
    NotFound { path: String },
}

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// ```
/// use patchview_json_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("~01"), "~1");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
///
/// ```
/// use patchview_json_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Check if a string consists only of ASCII digits.
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_step(component: &str) -> PathStep {
    if component == "-" {
        return PathStep::Append;
    }
    if is_integer(component) {
        // Digit runs too long for usize stay addressable as object keys.
        if let Ok(idx) = component.parse::<usize>() {
            return PathStep::Index(idx);
        }
    }
    PathStep::Key(unescape_component(component))
}

/// Parse a JSON Pointer string into path steps.
///
/// - Empty string returns the root (empty) path
/// - Everything before the first `/` is discarded
/// - `-` becomes [`PathStep::Append`], digit runs become [`PathStep::Index`]
/// - Other components are unescaped into [`PathStep::Key`]
///
/// ```
/// use patchview_json_pointer::{parse_json_pointer, PathStep};
///
/// assert!(parse_json_pointer("").is_empty());
/// assert_eq!(parse_json_pointer("/"), vec![PathStep::Key(String::new())]);
/// assert_eq!(
///     parse_json_pointer("/a~1b/-"),
///     vec![PathStep::Key("a/b".into()), PathStep::Append]
/// );
/// ```
pub fn parse_json_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer.split('/').skip(1).map(parse_step).collect()
}

/// Format path steps into a JSON Pointer string.
///
/// Returns an empty string for the root path.
pub fn format_json_pointer(path: &[PathStep]) -> String {
    let mut out = String::new();
    for step in path {
        out.push('/');
        match step {
            PathStep::Key(key) => out.push_str(&escape_component(key)),
            other => out.push_str(&other.to_string()),
        }
    }
    out
}

/// Join path steps with `/`, without escaping.
///
/// This is the display form used in error messages and as a lookup key for
/// per-path bookkeeping; unlike [`format_json_pointer`] it has no leading
/// slash and is not reversible.
///
/// ```
/// use patchview_json_pointer::{join_path, parse_json_pointer};
///
/// assert_eq!(join_path(&parse_json_pointer("/address/street")), "address/street");
/// assert_eq!(join_path(&parse_json_pointer("/hobbies/2")), "hobbies/2");
/// ```
pub fn join_path(path: &[PathStep]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}
