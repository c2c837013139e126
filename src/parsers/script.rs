//! JavaScript / HTML dialect parser.
//!
//! JavaScript files get a quote-aware lexical scan for `ts()` call sites.
//! HTML files are handled by the same parser: `<script>` block bodies are
//! scanned with the JavaScript lexer at their line offsets, then the blocks
//! are blanked out and the remaining markup is searched once more so calls
//! inside attribute values and `{{ ... }}` interpolations are found without
//! counting anything twice.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Catalog, Diagnostic, Occurrence};
use crate::parsers::Parse;
use crate::utils::line_at;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>(.*?)</script>").expect("script block pattern")
});

/// The one marker recognized in script dialects.
const MARKER: &str = "ts";

/// Parser for JavaScript and HTML sources.
#[derive(Debug, Clone, Default)]
pub struct ScriptParser;

impl Parse for ScriptParser {
    fn parse(&self, file_path: &str, content: &str, catalog: &mut Catalog) {
        if file_path.ends_with(".html") {
            self.parse_markup(file_path, content, catalog);
        } else {
            insert_calls(file_path, scan_js(content), 0, catalog);
        }
    }
}

impl ScriptParser {
    fn parse_markup(&self, file_path: &str, content: &str, catalog: &mut Catalog) {
        let mut blanked = content.as_bytes().to_vec();
        let mut calls = Vec::new();

        for captures in SCRIPT_BLOCK.captures_iter(content) {
            let Some(body) = captures.get(1) else {
                continue;
            };
            let offset = line_at(content, body.start()) - 1;
            calls.extend(scan_js(body.as_str()).into_iter().map(|mut call| {
                call.line += offset;
                call
            }));
            blank_range(&mut blanked, body.start(), body.end());
        }

        // Attribute values and interpolations in the remaining markup.
        if let Ok(markup) = String::from_utf8(blanked) {
            calls.extend(scan_markup_inline(&markup));
        }

        // References must land in source-line order regardless of which
        // pass found them.
        calls.sort_by_key(|call| call.line);
        insert_calls(file_path, calls, 0, catalog);
    }
}

/// Replace a byte range with spaces, keeping newlines so offsets and line
/// numbers stay valid.
fn blank_range(bytes: &mut [u8], start: usize, end: usize) {
    for b in &mut bytes[start..end] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

fn insert_calls(file_path: &str, calls: Vec<RawCall>, line_offset: usize, catalog: &mut Catalog) {
    for call in calls {
        let line = line_offset + call.line;
        match call.args.first() {
            Some(Arg::Literal(msgid)) => catalog.insert(Occurrence {
                msgid: msgid.clone(),
                file: file_path.to_string(),
                line,
                ..Default::default()
            }),
            Some(Arg::Other) => catalog.report(Diagnostic::NonLiteralArgument {
                file: file_path.to_string(),
                line,
                marker: MARKER.to_string(),
            }),
            None => {}
        }
    }
}

struct RawCall {
    line: usize,
    args: Vec<Arg>,
}

enum Arg {
    Literal(String),
    Other,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Lexer-driven scan of JavaScript source: comments and string literals are
/// consumed so marker names inside them are ignored.
fn scan_js(content: &str) -> Vec<RawCall> {
    let bytes = content.as_bytes();
    let mut calls = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = skip_block_comment(bytes, i);
        } else if b == b'\'' || b == b'"' || b == b'`' {
            i = match read_js_string(content, i) {
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
            if &content[start..end] != MARKER {
                continue;
            }
            if let Some(call) = call_at(content, start, end) {
                calls.push(call);
            }
        } else {
            i += 1;
        }
    }

    calls
}

/// Raw search for `ts(` call sites in markup text, without JavaScript
/// lexing: attribute quoting would otherwise be mistaken for string
/// context.
fn scan_markup_inline(content: &str) -> Vec<RawCall> {
    let bytes = content.as_bytes();
    let mut calls = Vec::new();
    let mut i = 0;

    while let Some(found) = content[i..].find(MARKER) {
        let start = i + found;
        let end = start + MARKER.len();
        i = end;

        if start > 0 && is_ident_char(bytes[start - 1]) {
            continue;
        }
        if bytes.get(end).copied().is_some_and(is_ident_char) {
            continue;
        }
        if let Some(call) = call_at(content, start, end) {
            calls.push(call);
        }
    }

    calls
}

/// Parse the call whose marker identifier spans `start..end`, if the next
/// significant character opens an argument list.
fn call_at(content: &str, start: usize, end: usize) -> Option<RawCall> {
    let bytes = content.as_bytes();
    let mut open = end;
    while open < bytes.len() && bytes[open].is_ascii_whitespace() {
        open += 1;
    }
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let args = parse_args(content, open + 1)?;
    Some(RawCall {
        line: line_at(content, start),
        args,
    })
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

/// Read the JavaScript string literal starting at the quote at `start`.
///
/// Returns the value (or `None` for a template literal containing `${`
/// interpolation, which is not a literal) and the index past the closing
/// quote; `None` overall if unterminated. Unknown escapes drop the
/// backslash, matching JavaScript.
fn read_js_string(content: &str, start: usize) -> Option<(Option<String>, usize)> {
    let bytes = content.as_bytes();
    let quote = bytes[start];
    let mut value = String::new();
    let mut interpolated = false;
    let mut i = start + 1;

    while i < bytes.len() {
        let b = bytes[i];
        if b == quote {
            let value = if interpolated { None } else { Some(value) };
            return Some((value, i + 1));
        }
        if quote == b'`' && b == b'$' && bytes.get(i + 1) == Some(&b'{') {
            interpolated = true;
            i += 2;
            continue;
        }
        if b != b'\\' {
            let c = content[i..].chars().next()?;
            value.push(c);
            i += c.len_utf8();
            continue;
        }
        let &next = bytes.get(i + 1)?;
        match next {
            b'n' => value.push('\n'),
            b't' => value.push('\t'),
            b'r' => value.push('\r'),
            _ => value.push(next as char),
        }
        i += 2;
    }
    None
}

enum Expect {
    Value,
    Operator,
}

/// Split an argument list on top-level commas; an argument is literal iff
/// it is a run of string literals joined by `+` concatenation.
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
            b'\'' | b'"' | b'`' => {
                let (value, end) = read_js_string(content, i)?;
                if depth == 0 {
                    match (value, &state) {
                        (Some(value), Expect::Value) => {
                            parts.push(value);
                            state = Expect::Operator;
                        }
                        _ => bad = true,
                    }
                    empty = false;
                }
                i = end;
            }
            b'+' if depth == 0 => {
                match state {
                    Expect::Operator => state = Expect::Value,
                    Expect::Value => bad = true,
                }
                empty = false;
                i += 1;
            }
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
