//! JSON Patch application with a line-annotated view of the result.
//!
//! - [`json_patch`]: applies RFC 6902 operations to a copy of a document and
//!   records what each one changed
//! - [`json_diff`]: renders the patched document as lines marked unchanged,
//!   added, or removed
//! - [`render`]: text, HTML, and JSON renderings of those lines
//!
//! [`generate_diff`] runs the whole pipeline from two JSON texts.
//!
//! ```
//! use patchview::{generate_diff, json_diff::LineType};
//!
//! let report = generate_diff(
//!     r#"{"age": 30, "city": "NY"}"#,
//!     r#"[{"op": "replace", "path": "/age", "value": 31},
//!         {"op": "remove", "path": "/city"}]"#,
//! )
//! .unwrap();
//!
//! assert_eq!(report.patched, serde_json::json!({"age": 31}));
//! assert_eq!(report.changes.len(), 2);
//! assert!(report
//!     .lines
//!     .iter()
//!     .any(|l| l.line_type == LineType::Removed && l.content == r#"  "city": "NY","#));
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod cli;
pub mod example;
pub mod json_diff;
pub mod json_equal;
pub mod json_patch;
pub mod render;

use json_diff::{annotate, AnnotatedLine};
use json_patch::{apply_json_patch, ApplyError, Change};

/// Which of the two inputs a parse error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Document,
    Patch,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Document => f.write_str("document"),
            Input::Patch => f.write_str("patch"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid {input} JSON: {source}")]
    Parse {
        input: Input,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Output of [`generate_diff`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    pub patched: Value,
    pub changes: Vec<Change>,
    pub lines: Vec<AnnotatedLine>,
}

fn parse(input: Input, text: &str) -> Result<Value, Error> {
    serde_json::from_str(text).map_err(|source| Error::Parse { input, source })
}

/// Parse a document and a patch, apply the patch, and annotate the result.
///
/// Both texts are parsed before any operation runs.
///
/// # Errors
///
/// [`Error::Parse`] when either text is not JSON, [`Error::Apply`] when an
/// operation fails. Nothing partial is returned.
pub fn generate_diff(document: &str, patch: &str) -> Result<DiffReport, Error> {
    let original = parse(Input::Document, document)?;
    let patch = parse(Input::Patch, patch)?;
    diff_values(&original, &patch)
}

/// [`generate_diff`] for already-parsed values.
pub fn diff_values(original: &Value, patch: &Value) -> Result<DiffReport, Error> {
    let result = apply_json_patch(original, patch)?;
    let lines = annotate(original, &result.doc, &result.changes);
    Ok(DiffReport {
        patched: result.doc,
        changes: result.changes,
        lines,
    })
}
