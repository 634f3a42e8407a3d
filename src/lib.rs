//! Core library for spdx-convert.
//!
//! This crate reads SPDX 2.x documents in five encodings (JSON, YAML, XML,
//! tag/value, RDF/XML), validates them against the SPDX 2.x rules, writes
//! them back to any of the five, and bumps them to the SPDX 3.x element
//! graph.

pub mod bump;
pub mod errors;
pub mod formats;
pub mod license;
pub mod models_v2;
pub mod models_v3;
pub mod notes;
pub mod validation;

use errors::SpdxError;
use formats::{Format, WriteOptions};
use log::info;
use models_v2::Document;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Top-level configuration for a conversion run.
#[derive(Debug)]
pub struct Config {
    /// Input path; `-` reads stdin and sniffs the format from content.
    pub input_file: PathBuf,
    /// Output path; `-` writes stdout in the input's format.
    pub output_file: PathBuf,
    /// Overrides the format derived from the input suffix.
    pub input_format: Option<Format>,
    /// Overrides the format derived from the output suffix.
    pub output_format: Option<Format>,
    /// Validate before writing.
    pub validate: bool,
    /// Validate against this version instead of the declared one,
    /// e.g. `SPDX-2.3`.
    pub version: Option<String>,
}

/// The main entry point for a conversion run.
///
/// Reads the input document, validates it unless told not to, and writes it
/// out in the output format. Validation problems come back as
/// [`SpdxError::Validation`] so the caller can format them.
pub fn run(config: Config) -> Result<(), SpdxError> {
    let start_time = Instant::now();
    info!("Reading {}", config.input_file.display());

    let (document, input_format) = read_input(&config)?;
    info!("  Input format: {:?}", input_format);

    if config.validate {
        let problems =
            validation::validate_document_with_version(&document, config.version.as_deref());
        if !problems.is_empty() {
            return Err(SpdxError::Validation(problems));
        }
        info!("Validation passed.");
    } else {
        info!("Skipping validation.");
    }

    let output_format = match config.output_format {
        Some(format) => format,
        None if is_stdio(&config.output_file) => input_format,
        None => Format::from_path(&config.output_file)?,
    };
    info!("  Output format: {:?}", output_format);

    // Validation already ran above against the requested version, so the
    // write path must not validate a second time against the declared one.
    let options = WriteOptions {
        validate: false,
        drop_duplicates: true,
    };
    if is_stdio(&config.output_file) {
        let stdout = std::io::stdout();
        formats::write_document(stdout.lock(), &document, output_format, options)?;
    } else {
        let file = File::create(&config.output_file).map_err(|e| {
            SpdxError::Io(
                e,
                format!("failed to create {}", config.output_file.display()),
            )
        })?;
        let mut writer = BufWriter::new(file);
        formats::write_document(&mut writer, &document, output_format, options)?;
        writer
            .flush()
            .map_err(|e| SpdxError::Io(e, "failed to flush output".to_string()))?;
    }

    info!("Done. (Took {:.2?})", start_time.elapsed());
    Ok(())
}

fn read_input(config: &Config) -> Result<(Document, Format), SpdxError> {
    if is_stdio(&config.input_file) {
        let mut content = Vec::new();
        std::io::stdin()
            .read_to_end(&mut content)
            .map_err(|e| SpdxError::Io(e, "failed to read stdin".to_string()))?;
        let format = match config.input_format {
            Some(format) => format,
            None => Format::from_content(&content)?,
        };
        let document = formats::read_document(Cursor::new(content), format)?;
        Ok((document, format))
    } else {
        let format = match config.input_format {
            Some(format) => format,
            None => Format::from_path(&config.input_file)?,
        };
        let file = File::open(&config.input_file).map_err(|e| {
            SpdxError::Io(e, format!("failed to open {}", config.input_file.display()))
        })?;
        let document = formats::read_document(BufReader::new(file), format)?;
        Ok((document, format))
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}
