//! Command-line interface layer.

mod args;
mod exit_status;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

pub use args::Arguments;
pub use exit_status::ExitStatus;

use crate::config;
use crate::extract::{self, ExtractOptions, ExtractSummary};

/// Success mark for consistent output formatting.
const SUCCESS_MARK: &str = "\u{2713}"; // ✓

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_files_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let start_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = config::load_config(&start_dir)?;
    let options = ExtractOptions {
        base: args.base.unwrap_or_else(|| PathBuf::from(".")),
        out: args.out,
        header: args.header.or(config.header.map(PathBuf::from)),
        append: args.append,
        msgctxt: args.msgctxt.or(config.msgctxt),
        excludes: if args.excludes.is_empty() {
            config.excludes
        } else {
            args.excludes
        },
        verbose: args.verbose,
    };

    let paths = extract::expand_stdin_token(&args.files, io::stdin().lock());
    let summary = extract::extract(&paths, &options)?;
    report(&summary, options.verbose);

    Ok(ExitStatus::Success)
}

/// Status output goes to stderr: stdout may be carrying the catalog.
fn report(summary: &ExtractSummary, verbose: bool) {
    if verbose {
        for diagnostic in &summary.diagnostics {
            eprintln!("{} {}", "warning:".bold().yellow(), diagnostic);
        }
    } else if !summary.diagnostics.is_empty() {
        eprintln!(
            "{} {} extraction warning(s) (use {} for details)",
            "warning:".bold().yellow(),
            summary.diagnostics.len(),
            "-v".cyan()
        );
    }

    eprintln!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} {} from {} {}",
            summary.entries,
            if summary.entries == 1 {
                "entry"
            } else {
                "entries"
            },
            summary.files_parsed,
            if summary.files_parsed == 1 {
                "file"
            } else {
                "files"
            },
        )
        .green()
    );
}
