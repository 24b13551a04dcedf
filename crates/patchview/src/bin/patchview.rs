use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use patchview::cli::{init_tracing, run, Cli, OutputFormat};
use patchview::render::render_html_error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(out) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(out.as_bytes()).and_then(|()| stdout.flush()) {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "patchview failed");
            let message = format!("Error: {e}");
            if cli.format == OutputFormat::Html {
                print!("{}", render_html_error(&message));
            } else {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        }
    }
}
