//! Renderers for annotated lines.

use std::fmt::Write;

use serde_json::json;

use crate::json_diff::AnnotatedLine;
use crate::DiffReport;

/// Numbered plain-text rendering, one row per line, with a `+`/`-` gutter.
///
/// ```
/// use patchview::json_diff::{AnnotatedLine, LineType};
/// use patchview::render::render_text;
///
/// let lines = [
///     AnnotatedLine::new(LineType::Unchanged, "{"),
///     AnnotatedLine::new(LineType::Added, r#"  "a": 1"#),
///     AnnotatedLine::new(LineType::Unchanged, "}"),
/// ];
/// assert_eq!(render_text(&lines), "   1   {\n   2 +   \"a\": 1\n   3   }\n");
/// ```
pub fn render_text(lines: &[AnnotatedLine]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "{:>4} {} {}", i + 1, line.line_type.marker(), line.content);
    }
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// HTML fragment: one `diff-line` row per line, classed by line type.
pub fn render_html(lines: &[AnnotatedLine]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(
            out,
            r#"<div class="diff-line {}"><div class="diff-line-number">{}</div><div class="diff-line-content">{}</div></div>"#,
            line.line_type,
            i + 1,
            escape_html(&line.content)
        );
    }
    out
}

pub fn render_html_error(message: &str) -> String {
    format!("<div class=\"error\">{}</div>\n", escape_html(message))
}

/// JSON object with the `{type, content}` line records and the change
/// records, plus the patched document when `with_patched` is set.
pub fn render_json(report: &DiffReport, with_patched: bool) -> Result<String, serde_json::Error> {
    let mut value = json!({
        "lines": report.lines,
        "changes": report.changes,
    });
    if with_patched {
        value["patched"] = report.patched.clone();
    }
    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    Ok(text)
}
