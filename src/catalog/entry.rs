//! The deduplicated unit of translatable content.

use std::collections::BTreeSet;

use crate::catalog::escape::escape;

/// A single source occurrence of an entry: where the string was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Path relative to the catalog base directory, with `/` separators.
    pub file: String,
    /// 1-based line number of the call site.
    pub line: usize,
}

impl Reference {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Identity of a catalog entry.
///
/// gettext keys entries by the (msgid, msgctxt) pair: the same msgid under
/// two different contexts is two distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub msgctxt: Option<String>,
    pub msgid: String,
}

/// One deduplicated translatable string with everything needed to emit its
/// POT block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgctxt: Option<String>,
    /// Every occurrence of this (msgid, msgctxt) pair, in discovery order.
    pub references: Vec<Reference>,
    /// Extracted comments (`#.` lines).
    pub comments: Vec<String>,
    /// Flags (`#,` line), e.g. `php-format`.
    pub flags: BTreeSet<String>,
}

impl CatalogEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            msgctxt: self.msgctxt.clone(),
            msgid: self.msgid.clone(),
        }
    }

    /// Append a reference unless the exact (file, line) pair is already
    /// recorded.
    pub fn push_reference(&mut self, reference: Reference) {
        if !self.references.contains(&reference) {
            self.references.push(reference);
        }
    }

    /// Append an extracted comment unless already present.
    pub fn push_comment(&mut self, comment: String) {
        if !self.comments.contains(&comment) {
            self.comments.push(comment);
        }
    }

    /// The lines of this entry's POT block, without the separating blank
    /// line.
    ///
    /// Line order follows gettext conventions: extracted comments,
    /// references, flags, then the message fields. Translation slots are
    /// left empty; plural entries get the minimal two placeholder forms.
    pub fn to_pot_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4 + self.references.len() + self.comments.len());
        for comment in &self.comments {
            lines.push(format!("#. {}", comment));
        }
        for reference in &self.references {
            lines.push(format!("#: {}", reference));
        }
        if !self.flags.is_empty() {
            let flags: Vec<&str> = self.flags.iter().map(String::as_str).collect();
            lines.push(format!("#, {}", flags.join(", ")));
        }
        if let Some(msgctxt) = &self.msgctxt {
            lines.push(format!("msgctxt \"{}\"", escape(msgctxt)));
        }
        lines.push(format!("msgid \"{}\"", escape(&self.msgid)));
        match &self.msgid_plural {
            Some(plural) => {
                lines.push(format!("msgid_plural \"{}\"", escape(plural)));
                lines.push("msgstr[0] \"\"".to_string());
                lines.push("msgstr[1] \"\"".to_string());
            }
            None => lines.push("msgstr \"\"".to_string()),
        }
        lines
    }
}
