//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Files or directories to extract strings from. Use "-" to also
    /// accept file names from stdin, one per line
    pub files: Vec<String>,

    /// Base directory for constructing relative source references
    #[arg(short, long)]
    pub base: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Header file prepended verbatim when creating new output
    #[arg(long)]
    pub header: Option<PathBuf>,

    /// Append to the output file instead of overwriting it
    #[arg(long)]
    pub append: bool,

    /// Default msgctxt stamped onto entries without an explicit context
    #[arg(long)]
    pub msgctxt: Option<String>,

    /// Directory name to skip during discovery; repeatable (overrides
    /// config)
    #[arg(long = "exclude", value_name = "NAME")]
    pub excludes: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Arguments {
    /// Check that input paths were provided, otherwise print help and
    /// return None.
    pub fn with_files_or_help(self) -> Option<Self> {
        if self.files.is_empty() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}
