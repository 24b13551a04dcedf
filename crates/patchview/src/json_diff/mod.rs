//! Line-level annotation of a patched document.
//!
//! [`annotate`] renders the patched document as indented JSON-like lines and
//! marks each line as unchanged, added, or removed, using the change records
//! produced while patching and the original document as ground truth.

mod annotate;

use std::fmt;

use serde::Serialize;

pub use annotate::annotate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Unchanged,
    Added,
    Removed,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Unchanged => "unchanged",
            LineType::Added => "added",
            LineType::Removed => "removed",
        }
    }

    /// Gutter marker used by the text renderer.
    pub fn marker(&self) -> char {
        match self {
            LineType::Unchanged => ' ',
            LineType::Added => '+',
            LineType::Removed => '-',
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered line of the patched document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedLine {
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub content: String,
}

impl AnnotatedLine {
    pub fn new(line_type: LineType, content: impl Into<String>) -> Self {
        Self {
            line_type,
            content: content.into(),
        }
    }
}
