//! Command-line host: reads inputs, runs the pipeline, renders the result.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::example::{EXAMPLE_DOCUMENT, EXAMPLE_PATCH};
use crate::render::{render_html, render_json, render_text};
use crate::{generate_diff, Error as DiffError};

#[derive(Parser, Debug)]
#[command(name = "patchview")]
#[command(version, about = "Apply a JSON Patch and show the result as an annotated diff", long_about = None)]
pub struct Cli {
    /// Document to patch (`-` or omitted: stdin)
    #[arg(short, long, value_name = "FILE")]
    pub doc: Option<PathBuf>,

    /// File holding the JSON Patch array
    #[arg(short, long, value_name = "FILE", conflicts_with = "patch_json")]
    pub patch: Option<PathBuf>,

    /// JSON Patch array given inline
    #[arg(long, value_name = "JSON")]
    pub patch_json: Option<String>,

    /// Use the built-in sample document and patch
    #[arg(long, conflicts_with_all = ["doc", "patch", "patch_json"])]
    pub example: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also print the patched document
    #[arg(long)]
    pub show_patched: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("No patch given: use --patch, --patch-json or --example")]
    MissingPatch,
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `verbose`.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).map_err(CliError::Stdin)?;
    Ok(buf)
}

/// Resolve the document and patch texts the flags point at.
pub fn load_inputs(cli: &Cli) -> Result<(String, String), CliError> {
    if cli.example {
        return Ok((EXAMPLE_DOCUMENT.to_string(), EXAMPLE_PATCH.to_string()));
    }
    let patch = match (&cli.patch, &cli.patch_json) {
        (_, Some(inline)) => inline.clone(),
        (Some(path), None) => read_file(path)?,
        (None, None) => return Err(CliError::MissingPatch),
    };
    let document = match &cli.doc {
        Some(path) if path.as_path() != Path::new("-") => read_file(path)?,
        _ => read_stdin()?,
    };
    Ok((document, patch))
}

/// Run the pipeline on already-loaded texts and render it per `cli.format`.
pub fn render_report(cli: &Cli, document: &str, patch: &str) -> Result<String, CliError> {
    let report = generate_diff(document, patch)?;
    info!(
        changes = report.changes.len(),
        lines = report.lines.len(),
        "generated diff"
    );

    let mut out = match cli.format {
        OutputFormat::Text => render_text(&report.lines),
        OutputFormat::Html => render_html(&report.lines),
        OutputFormat::Json => return Ok(render_json(&report, cli.show_patched)?),
    };
    if cli.show_patched {
        out.push('\n');
        out.push_str(&serde_json::to_string_pretty(&report.patched)?);
        out.push('\n');
    }
    Ok(out)
}

/// Load inputs, generate the diff, and return the rendered output.
pub fn run(cli: &Cli) -> Result<String, CliError> {
    let (document, patch) = load_inputs(cli)?;
    debug!(
        document_bytes = document.len(),
        patch_bytes = patch.len(),
        "loaded inputs"
    );
    render_report(cli, &document, &patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("patchview").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--patch-json", "[]"]);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.example);
        assert!(!cli.show_patched);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.doc, None);
    }

    #[test]
    fn verbose_counts() {
        assert_eq!(parse(&["--example", "-vv"]).verbose, 2);
    }

    #[test]
    fn example_conflicts_with_inputs() {
        let res = Cli::try_parse_from(["patchview", "--example", "--patch-json", "[]"]);
        assert!(res.is_err());
    }

    #[test]
    fn patch_sources_conflict() {
        let res = Cli::try_parse_from(["patchview", "--patch", "p.json", "--patch-json", "[]"]);
        assert!(res.is_err());
    }

    #[test]
    fn missing_patch() {
        let cli = parse(&["--doc", "doc.json"]);
        assert!(matches!(load_inputs(&cli), Err(CliError::MissingPatch)));
    }

    #[test]
    fn missing_file_names_path() {
        let cli = parse(&["--doc", "/nonexistent/doc.json", "--patch-json", "[]"]);
        let err = load_inputs(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read /nonexistent/doc.json"));
    }

    #[test]
    fn example_text_output() {
        let out = run(&parse(&["--example"])).unwrap();
        let rows: Vec<_> = out.lines().collect();
        assert_eq!(rows.len(), 19);
        assert_eq!(rows[2], r#"   3 -   "age": 30,"#);
        assert_eq!(rows[3], r#"   4 +   "age": 31,"#);
    }

    #[test]
    fn json_output_includes_patched_on_request() {
        let cli = parse(&["--example", "--format", "json", "--show-patched"]);
        let out = run(&cli).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["changes"].as_array().unwrap().len(), 5);
        assert_eq!(value["patched"]["email"], "john@example.com");
        assert_eq!(value["lines"][0], json!({"type": "unchanged", "content": "{"}));
    }

    #[test]
    fn text_output_appends_patched_document() {
        let cli = parse(&["--patch-json", "[]", "--show-patched"]);
        let out = render_report(&cli, r#"{"a":1}"#, "[]").unwrap();
        assert_eq!(out, "   1   {\n   2     \"a\": 1\n   3   }\n\n{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn apply_failure_surfaces() {
        let cli = parse(&["--patch-json", "[]"]);
        let err = render_report(&cli, "{}", r#"[{"op": "remove", "path": "/x"}]"#).unwrap_err();
        assert!(matches!(err, CliError::Diff(DiffError::Apply(_))));
        assert_eq!(
            err.to_string(),
            r#"Failed to apply patch {"op":"remove","path":"/x"}: Path not found: x"#
        );
    }

    #[test]
    fn parse_failure_surfaces() {
        let cli = parse(&["--patch-json", "[]"]);
        let err = render_report(&cli, "{", "[]").unwrap_err();
        assert!(matches!(err, CliError::Diff(DiffError::Parse { .. })));
        assert!(err.to_string().starts_with("Invalid document JSON: "));
    }

    #[test]
    fn json_output_omits_patched_by_default() {
        let cli = parse(&["--example", "--format", "json"]);
        let value: serde_json::Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();
        assert_eq!(value["lines"].as_array().unwrap().len(), 19);
        assert!(value.get("patched").is_none());
    }
}
