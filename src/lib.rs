//! Potx - translatable-string extraction for PHP projects
//!
//! Potx is a CLI tool and library that extracts translatable strings from
//! a mixed tree of PHP sources, Smarty templates, JavaScript, HTML, and
//! PHP settings files, and aggregates them into a single deduplicated
//! gettext POT catalog.
//!
//! ## Module Structure
//!
//! - `catalog`: The aggregated message catalog and POT serialization
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `discover`: Recursive input-path expansion
//! - `dispatch`: File-type dispatch to dialect parsers
//! - `extract`: The extraction driver (discovery → parse → output)
//! - `parsers`: Dialect parsers (PHP, Smarty, JS/HTML, settings)
//! - `utils`: Shared utility functions

pub mod catalog;
pub mod cli;
pub mod config;
pub mod discover;
pub mod dispatch;
pub mod extract;
pub mod parsers;
pub mod utils;
