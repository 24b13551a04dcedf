//! Type definitions for JSON Pointer.

use std::borrow::Cow;
use std::fmt;

/// A step in a JSON Pointer path.
///
/// Purely numeric components are parsed as indices, the `-` component as the
/// append token, and everything else as an (unescaped) object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Object member name.
    Key(String),
    /// Array position.
    Index(usize),
    /// The `-` token: one past the last element of an array.
    Append,
}

/// A JSON Pointer path.
pub type Path = Vec<PathStep>;

impl PathStep {
    /// Returns the array index, if this step is numeric.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathStep::Index(idx) => Some(*idx),
            _ => None,
        }
    }

    /// The object member name this step addresses.
    ///
    /// Numeric steps address the member named by their decimal form and the
    /// append token addresses the member `"-"`.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            PathStep::Key(key) => Cow::Borrowed(key),
            PathStep::Index(idx) => Cow::Owned(idx.to_string()),
            PathStep::Append => Cow::Borrowed("-"),
        }
    }
}

/// Writes the raw, unescaped form of the step.
impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => f.write_str(key),
            PathStep::Index(idx) => write!(f, "{idx}"),
            PathStep::Append => f.write_str("-"),
        }
    }
}

impl From<usize> for PathStep {
    fn from(idx: usize) -> Self {
        PathStep::Index(idx)
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}
