//! The extraction driver.
//!
//! Orchestrates one run: discovery → dispatch → parse → serialize, and owns
//! the header/append output semantics. Per-file problems never abort the
//! run; the only fatal errors are reading the header file and writing the
//! destination.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::catalog::{Catalog, Diagnostic};
use crate::discover::{self, STDIN_TOKEN};
use crate::dispatch::ParserSet;
use crate::parsers::Parse;

/// Configuration surface of one extraction run, resolved by the CLI layer.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Base directory for relative source references.
    pub base: PathBuf,
    /// Destination file; `None` writes to stdout.
    pub out: Option<PathBuf>,
    /// File prepended verbatim when creating new output.
    pub header: Option<PathBuf>,
    /// Concatenate after existing output instead of overwriting.
    pub append: bool,
    /// Default msgctxt for entries without an explicit context.
    pub msgctxt: Option<String>,
    /// Directory names excluded from discovery.
    pub excludes: Vec<String>,
    pub verbose: bool,
}

/// Counts and diagnostics from a finished run.
#[derive(Debug)]
pub struct ExtractSummary {
    /// Files produced by discovery.
    pub files_scanned: usize,
    /// Files a parser accepted.
    pub files_parsed: usize,
    /// Distinct catalog entries.
    pub entries: usize,
    /// Total recorded references.
    pub references: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Replace the `-` token with path names read from `reader`, one per line.
pub fn expand_stdin_token(paths: &[String], reader: impl BufRead) -> Vec<String> {
    if !paths.iter().any(|p| p == STDIN_TOKEN) {
        return paths.to_vec();
    }
    let mut expanded: Vec<String> = paths
        .iter()
        .filter(|p| *p != STDIN_TOKEN)
        .cloned()
        .collect();
    expanded.extend(discover::read_path_list(reader));
    expanded
}

/// Run one extraction over `paths` and write the serialized catalog.
pub fn extract(paths: &[String], options: &ExtractOptions) -> Result<ExtractSummary> {
    let files = discover::discover(paths, &options.excludes, options.verbose);

    let mut catalog = Catalog::new(&options.base);
    if let Some(msgctxt) = &options.msgctxt {
        catalog = catalog.with_default_msgctxt(msgctxt.clone());
    }

    let parsers = ParserSet::new();
    let mut files_parsed = 0;

    for file in &files {
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(err) => {
                if options.verbose {
                    eprintln!(
                        "{} Cannot read file {}: {}",
                        "warning:".bold().yellow(),
                        file,
                        err
                    );
                }
                // Unreadable input is never fatal; scan it as empty.
                String::new()
            }
        };
        match parsers.select(file, &content) {
            Some(parser) => {
                if options.verbose {
                    eprintln!("extracting {}", file);
                }
                parser.parse(file, &content, &mut catalog);
                files_parsed += 1;
            }
            None => {
                if options.verbose {
                    eprintln!("skipping {} (no parser)", file);
                }
            }
        }
    }

    write_output(&catalog, options)?;

    Ok(ExtractSummary {
        files_scanned: files.len(),
        files_parsed,
        entries: catalog.len(),
        references: catalog.reference_count(),
        diagnostics: catalog.diagnostics().to_vec(),
    })
}

/// Write the serialized catalog, honoring header and append semantics: the
/// header goes out only when the destination is being created (or on
/// stdout), never when appending onto existing content.
fn write_output(catalog: &Catalog, options: &ExtractOptions) -> Result<()> {
    let body = catalog.serialize();
    let header = match &options.header {
        Some(path) => Some(fs::read_to_string(path).with_context(|| {
            format!("Failed to read header file: {}", path.display())
        })?),
        None => None,
    };

    let Some(out) = &options.out else {
        let mut stdout = io::stdout().lock();
        if let Some(header) = &header {
            stdout
                .write_all(header.as_bytes())
                .context("Failed to write catalog to stdout")?;
        }
        stdout
            .write_all(body.as_bytes())
            .context("Failed to write catalog to stdout")?;
        return Ok(());
    };

    let existing_len = fs::metadata(out).map(|m| m.len()).unwrap_or(0);
    if options.append && existing_len > 0 {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(out)
            .with_context(|| format!("Failed to open output file: {}", out.display()))?;
        // Keep the block separation between old and new content intact.
        if !body.is_empty() {
            file.write_all(b"\n")
                .and_then(|()| file.write_all(body.as_bytes()))
                .with_context(|| format!("Failed to write output file: {}", out.display()))?;
        }
    } else {
        let mut text = String::new();
        if let Some(header) = header {
            text.push_str(&header);
        }
        text.push_str(&body);
        fs::write(out, text)
            .with_context(|| format!("Failed to write output file: {}", out.display()))?;
    }

    Ok(())
}
