//! PHP dialect parser.
//!
//! A literal-aware lexical scan, not a full PHP parser: comments and string
//! literals are tracked so marker names inside them are never mistaken for
//! call sites, and everything else is noise. Only string-literal arguments
//! (including `.`-concatenated runs of literals) are extractable; a call
//! whose translatable argument is a variable or expression is skipped and
//! reported as a diagnostic.

use crate::catalog::{Catalog, Diagnostic, Occurrence};
use crate::parsers::Parse;
use crate::utils::line_at;

/// A translation-marker function and the argument slots that carry
/// translatable literals.
struct MarkerSpec {
    name: &'static str,
    msgid: usize,
    msgid_plural: Option<usize>,
    msgctxt: Option<usize>,
}

/// Recognized markers, gettext keyword conventions plus the `ts()` helper.
const MARKERS: &[MarkerSpec] = &[
    MarkerSpec {
        name: "ts",
        msgid: 0,
        msgid_plural: None,
        msgctxt: None,
    },
    MarkerSpec {
        name: "gettext",
        msgid: 0,
        msgid_plural: None,
        msgctxt: None,
    },
    MarkerSpec {
        name: "ngettext",
        msgid: 0,
        msgid_plural: Some(1),
        msgctxt: None,
    },
    MarkerSpec {
        name: "pgettext",
        msgid: 1,
        msgid_plural: None,
        msgctxt: Some(0),
    },
    MarkerSpec {
        name: "npgettext",
        msgid: 1,
        msgid_plural: Some(2),
        msgctxt: Some(0),
    },
];

/// Parser for PHP sources.
#[derive(Debug, Clone, Default)]
pub struct PhpParser;

impl PhpParser {
    /// Scan `content` as PHP and insert discovered strings.
    ///
    /// `line_offset` shifts reported line numbers; template parsers use it
    /// when handing over an embedded block so references point into the
    /// host file.
    pub fn parse_embedded(
        &self,
        file_path: &str,
        content: &str,
        line_offset: usize,
        catalog: &mut Catalog,
    ) {
        for call in scan(content) {
            let line = line_offset + call.line;

            let msgid = match call.args.get(call.spec.msgid) {
                Some(Arg::Literal(s)) => s.clone(),
                Some(Arg::Other) => {
                    catalog.report(Diagnostic::NonLiteralArgument {
                        file: file_path.to_string(),
                        line,
                        marker: call.spec.name.to_string(),
                    });
                    continue;
                }
                None => continue,
            };
            let Some(msgctxt) = literal_slot(&call, call.spec.msgctxt, file_path, line, catalog)
            else {
                continue;
            };
            let Some(msgid_plural) =
                literal_slot(&call, call.spec.msgid_plural, file_path, line, catalog)
            else {
                continue;
            };

            let mut flags = Vec::new();
            if has_format_placeholder(&msgid)
                || msgid_plural.as_deref().is_some_and(has_format_placeholder)
            {
                flags.push("php-format".to_string());
            }

            catalog.insert(Occurrence {
                msgid,
                msgid_plural,
                msgctxt,
                file: file_path.to_string(),
                line,
                comments: Vec::new(),
                flags,
            });
        }
    }
}

impl Parse for PhpParser {
    fn parse(&self, file_path: &str, content: &str, catalog: &mut Catalog) {
        self.parse_embedded(file_path, content, 0, catalog);
    }
}

/// Resolve an optional argument slot to its literal value.
///
/// `Ok` cases collapse to `Some(value)`; a present-but-non-literal argument
/// poisons the whole call (`None`) after reporting, since extracting the
/// msgid while dropping its context would change the entry's identity.
fn literal_slot(
    call: &RawCall<'_>,
    slot: Option<usize>,
    file_path: &str,
    line: usize,
    catalog: &mut Catalog,
) -> Option<Option<String>> {
    let Some(position) = slot else {
        return Some(None);
    };
    match call.args.get(position) {
        Some(Arg::Literal(s)) => Some(Some(s.clone())),
        Some(Arg::Other) => {
            catalog.report(Diagnostic::NonLiteralArgument {
                file: file_path.to_string(),
                line,
                marker: call.spec.name.to_string(),
            });
            None
        }
        None => Some(None),
    }
}

/// True for `%1`-style and printf-style placeholders.
pub(crate) fn has_format_placeholder(s: &str) -> bool {
    s.as_bytes()
        .windows(2)
        .any(|w| w[0] == b'%' && (w[1].is_ascii_digit() || matches!(w[1], b's' | b'd')))
}

struct RawCall<'a> {
    spec: &'a MarkerSpec,
    line: usize,
    args: Vec<Arg>,
}

enum Arg {
    Literal(String),
    Other,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find every marker call site in `content`.
///
/// Arguments of a found call are classified by lookahead only; scanning
/// resumes inside the argument list, so marker calls nested in non-literal
/// arguments are still found.
fn scan(content: &str) -> Vec<RawCall<'static>> {
    let bytes = content.as_bytes();
    let mut calls = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            i = skip_line(bytes, i);
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = skip_block_comment(bytes, i);
        } else if b == b'#' {
            i = skip_line(bytes, i);
        } else if b == b'\'' || b == b'"' {
            i = match read_string(content, i) {
                Some((_, end)) => end,
                None => bytes.len(),
            };
        } else if is_ident_start(b) {
            let start = i;
            let mut end = i + 1;
            while end < bytes.len() && is_ident_char(bytes[end]) {
                end += 1;
            }
            i = end;
            if start > 0 && bytes[start - 1] == b'$' {
                continue;
            }
            let Some(spec) = MARKERS.iter().find(|m| m.name == &content[start..end]) else {
                continue;
            };
            let open = skip_whitespace(bytes, end);
            if bytes.get(open) != Some(&b'(') {
                continue;
            }
            if let Some(args) = parse_args(content, open + 1) {
                calls.push(RawCall {
                    spec,
                    line: line_at(content, start),
                    args,
                });
            }
            // Resume inside the argument list so nested calls are found.
            i = open + 1;
        } else {
            i += 1;
        }
    }

    calls
}

fn skip_line(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

fn skip_block_comment(bytes: &[u8], mut i: usize) -> usize {
    i += 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Read the PHP string literal starting at the quote at `start`.
///
/// Single-quoted strings only unescape `\'` and `\\`; double-quoted strings
/// unescape the common control escapes and keep the backslash for unknown
/// sequences, matching PHP. Returns the value and the index past the
/// closing quote, or `None` if unterminated.
pub(crate) fn read_string(content: &str, start: usize) -> Option<(String, usize)> {
    let bytes = content.as_bytes();
    let quote = bytes[start];
    let mut value = String::new();
    let mut i = start + 1;

    while i < bytes.len() {
        let b = bytes[i];
        if b == quote {
            return Some((value, i + 1));
        }
        if b != b'\\' {
            // Keep multi-byte sequences intact.
            let c = content[i..].chars().next()?;
            value.push(c);
            i += c.len_utf8();
            continue;
        }
        let Some(&next) = bytes.get(i + 1) else {
            break;
        };
        if quote == b'\'' {
            match next {
                b'\'' | b'\\' => value.push(next as char),
                _ => {
                    value.push('\\');
                    value.push(next as char);
                }
            }
        } else {
            match next {
                b'n' => value.push('\n'),
                b't' => value.push('\t'),
                b'r' => value.push('\r'),
                b'"' => value.push('"'),
                b'\\' => value.push('\\'),
                b'$' => value.push('$'),
                _ => {
                    value.push('\\');
                    value.push(next as char);
                }
            }
        }
        i += 2;
    }
    None
}

enum Expect {
    Value,
    Operator,
}

/// Split a call's argument list on top-level commas and classify each
/// argument.
///
/// An argument is literal iff it is a run of string literals joined by `.`
/// concatenation. Returns `None` for an unterminated list (best-effort:
/// the truncated call yields nothing).
fn parse_args(content: &str, start: usize) -> Option<Vec<Arg>> {
    let bytes = content.as_bytes();
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut parts: Vec<String> = Vec::new();
    let mut state = Expect::Value;
    let mut bad = false;
    let mut empty = true;
    let mut i = start;

    loop {
        let &b = bytes.get(i)?;
        match b {
            b')' if depth == 0 => {
                if !empty {
                    args.push(finish_arg(parts, state, bad));
                }
                return Some(args);
            }
            b',' if depth == 0 => {
                args.push(finish_arg(std::mem::take(&mut parts), state, bad));
                state = Expect::Value;
                bad = false;
                empty = true;
                i += 1;
            }
            b'\'' | b'"' => {
                let (value, end) = read_string(content, i)?;
                if depth == 0 {
                    match state {
                        Expect::Value => {
                            parts.push(value);
                            state = Expect::Operator;
                        }
                        Expect::Operator => bad = true,
                    }
                    empty = false;
                }
                i = end;
            }
            b'.' if depth == 0 => {
                match state {
                    Expect::Operator => state = Expect::Value,
                    Expect::Value => bad = true,
                }
                empty = false;
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            b'#' => i = skip_line(bytes, i),
            b'(' | b'[' | b'{' => {
                if depth == 0 {
                    bad = true;
                    empty = false;
                }
                depth += 1;
                i += 1;
            }
            b')' | b']' | b'}' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            _ => {
                if depth == 0 && !b.is_ascii_whitespace() {
                    bad = true;
                    empty = false;
                }
                i += 1;
            }
        }
    }
}

fn finish_arg(parts: Vec<String>, state: Expect, bad: bool) -> Arg {
    if !bad && matches!(state, Expect::Operator) && !parts.is_empty() {
        Arg::Literal(parts.concat())
    } else {
        Arg::Other
    }
}
