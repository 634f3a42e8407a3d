//! Main binary entry point for spdx-convert.

use clap::Parser;
use spdx_convert::errors::SpdxError;
use spdx_convert::Config;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Cli {
    /// Input document; `-` reads stdin and detects the format from content
    #[arg(short, long, value_name = "FILE")]
    infile: PathBuf,

    /// Output document; `-` writes stdout in the input's format
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    outfile: PathBuf,

    /// Skip validation before writing
    #[arg(long)]
    novalidation: bool,

    /// Validate against this SPDX version instead of the declared one
    #[arg(long, value_name = "SPDX-M.m")]
    version: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter_level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter(None, filter_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_app() -> Result<(), SpdxError> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = Config {
        input_file: cli.infile,
        output_file: cli.outfile,
        input_format: None,
        output_format: None,
        validate: !cli.novalidation,
        version: cli.version,
    };

    spdx_convert::run(config)
}

fn main() -> ExitCode {
    match run_app() {
        Ok(_) => ExitCode::SUCCESS,
        Err(SpdxError::Validation(messages)) => {
            log::error!(
                "The document is invalid: {} problem(s) found.",
                messages.len()
            );
            let colored = std::io::stderr().is_terminal();
            for message in &messages {
                if colored {
                    eprint!("{}", message.format_colored());
                } else {
                    eprint!("{}", message.format_plain());
                }
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("A fatal error occurred:");
            log::error!("{}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(s) = source {
                log::error!("  Caused by: {}", s);
                source = std::error::Error::source(s);
            }
            ExitCode::FAILURE
        }
    }
}
