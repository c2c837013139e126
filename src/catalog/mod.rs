//! The aggregated message catalog for one extraction run.
//!
//! Every dialect parser reports [`Occurrence`]s into a single [`Catalog`],
//! which owns deduplication, default-context injection, reference merging,
//! and POT serialization. Entries are kept in insertion order, which is
//! deterministic because files are parsed in sorted discovery order; the
//! serialized output is therefore byte-stable across runs.

mod entry;
pub mod escape;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub use entry::{CatalogEntry, EntryKey, Reference};

/// One discovered translation-marker occurrence, as reported by a parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occurrence {
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgctxt: Option<String>,
    /// Path of the file being parsed, as handed to the parser.
    pub file: String,
    /// 1-based line of the call site.
    pub line: usize,
    /// Extracted comments to attach (`#.` lines).
    pub comments: Vec<String>,
    /// Flags to attach (`#,` line).
    pub flags: Vec<String>,
}

/// A non-fatal anomaly observed while scanning or aggregating.
///
/// Diagnostics never abort a run; the CLI surfaces them on stderr in
/// verbose mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A marker call site whose translatable argument is not a string
    /// literal. The call is skipped entirely.
    NonLiteralArgument {
        file: String,
        line: usize,
        marker: String,
    },
    /// A later occurrence supplied a different plural form than the one
    /// already recorded for the same (msgid, msgctxt) key. First wins.
    PluralConflict {
        msgid: String,
        kept: String,
        ignored: String,
        reference: Reference,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NonLiteralArgument { file, line, marker } => {
                write!(
                    f,
                    "{}:{}: non-literal argument to {}(), call skipped",
                    file, line, marker
                )
            }
            Diagnostic::PluralConflict {
                msgid,
                kept,
                ignored,
                reference,
            } => {
                write!(
                    f,
                    "{}: conflicting plural for \"{}\": kept \"{}\", ignored \"{}\"",
                    reference, msgid, kept, ignored
                )
            }
        }
    }
}

/// Aggregated catalog for one extraction run.
pub struct Catalog {
    base: PathBuf,
    default_msgctxt: Option<String>,
    entries: Vec<CatalogEntry>,
    index: HashMap<EntryKey, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Catalog {
    /// Create an empty catalog whose references are relativized against
    /// `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            default_msgctxt: None,
            entries: Vec::new(),
            index: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Stamp `msgctxt` onto every insertion that does not carry its own
    /// context.
    pub fn with_default_msgctxt(mut self, msgctxt: impl Into<String>) -> Self {
        self.default_msgctxt = Some(msgctxt.into());
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of recorded references across all entries.
    pub fn reference_count(&self) -> usize {
        self.entries.iter().map(|e| e.references.len()).sum()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Record a non-fatal anomaly.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Merge one occurrence into the catalog.
    ///
    /// An existing (msgid, msgctxt) entry gains a reference; a new pair
    /// becomes a new entry at the end. Empty msgids are rejected. A plural
    /// form fills an entry that lacks one; a conflicting plural is ignored
    /// (first wins) and reported as a diagnostic.
    pub fn insert(&mut self, occurrence: Occurrence) {
        if occurrence.msgid.is_empty() {
            return;
        }

        let msgctxt = occurrence
            .msgctxt
            .or_else(|| self.default_msgctxt.clone());
        let key = EntryKey {
            msgctxt: msgctxt.clone(),
            msgid: occurrence.msgid.clone(),
        };
        let reference = Reference::new(self.relativize(&occurrence.file), occurrence.line);

        match self.index.get(&key) {
            Some(&i) => {
                let mut conflict = None;
                let entry = &mut self.entries[i];
                entry.push_reference(reference.clone());
                if let Some(plural) = occurrence.msgid_plural {
                    match &entry.msgid_plural {
                        None => entry.msgid_plural = Some(plural),
                        Some(kept) if *kept != plural => {
                            conflict = Some(Diagnostic::PluralConflict {
                                msgid: occurrence.msgid.clone(),
                                kept: kept.clone(),
                                ignored: plural,
                                reference,
                            });
                        }
                        Some(_) => {}
                    }
                }
                for comment in occurrence.comments {
                    entry.push_comment(comment);
                }
                entry.flags.extend(occurrence.flags);
                if let Some(conflict) = conflict {
                    self.diagnostics.push(conflict);
                }
            }
            None => {
                self.entries.push(CatalogEntry {
                    msgid: occurrence.msgid,
                    msgid_plural: occurrence.msgid_plural,
                    msgctxt,
                    references: vec![reference],
                    comments: occurrence.comments,
                    flags: occurrence.flags.into_iter().collect(),
                });
                self.index.insert(key, self.entries.len() - 1);
            }
        }
    }

    /// Serialize the catalog as POT text: one block per entry in insertion
    /// order, blocks separated by a blank line.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for line in entry.to_pot_lines() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// Compute a reference path relative to the base directory.
    ///
    /// Falls back to canonicalizing both sides so that relative inputs
    /// resolve against an absolute base; a path outside the base is kept
    /// as given.
    fn relativize(&self, file: &str) -> String {
        let path = Path::new(file);
        let relative = path
            .strip_prefix(&self.base)
            .map(Path::to_path_buf)
            .or_else(|_| -> Result<PathBuf, ()> {
                let file = path.canonicalize().map_err(|_| ())?;
                let base = self.base.canonicalize().map_err(|_| ())?;
                file.strip_prefix(&base)
                    .map(Path::to_path_buf)
                    .map_err(|_| ())
            });
        match relative {
            Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
            Err(()) => file.trim_start_matches("./").to_string(),
        }
    }
}
