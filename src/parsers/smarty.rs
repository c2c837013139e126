//! Smarty template dialect parser.
//!
//! Recognizes the `{ts}` translation tag in two shapes: a block whose body
//! is the msgid (`{ts}Save{/ts}`, optionally with `context`/`plural`
//! attributes) and a self-contained tag whose `msgid` attribute supplies
//! the string. Embedded `{php}` blocks are handed to a composed
//! [`PhpParser`] with the correct line offset.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Catalog, Diagnostic, Occurrence};
use crate::parsers::Parse;
use crate::parsers::php::{PhpParser, has_format_placeholder};
use crate::utils::line_at;

static PHP_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{php\}(.*?)\{/php\}").expect("php block pattern"));

/// Parser for Smarty templates. Holds the PHP parser it delegates embedded
/// blocks to.
#[derive(Debug, Clone, Default)]
pub struct SmartyParser {
    php: PhpParser,
}

impl SmartyParser {
    pub fn new(php: PhpParser) -> Self {
        Self { php }
    }
}

/// A region of the template that produces insertions, ordered by position
/// so references land in source order.
enum Piece<'a> {
    Php { body: &'a str, offset: usize },
    Tag(TsTag),
}

impl Parse for SmartyParser {
    fn parse(&self, file_path: &str, content: &str, catalog: &mut Catalog) {
        let mut blanked = content.as_bytes().to_vec();
        let mut pieces: Vec<(usize, Piece<'_>)> = Vec::new();

        for captures in PHP_BLOCK.captures_iter(content) {
            let Some(body) = captures.get(1) else {
                continue;
            };
            pieces.push((
                body.start(),
                Piece::Php {
                    body: body.as_str(),
                    offset: line_at(content, body.start()) - 1,
                },
            ));
            for b in &mut blanked[body.start()..body.end()] {
                if *b != b'\n' {
                    *b = b' ';
                }
            }
        }

        let Ok(template) = String::from_utf8(blanked) else {
            return;
        };
        // Blanking is byte-for-byte, so tag positions index into `content`
        // as well.
        for tag in scan_tags(&template) {
            pieces.push((tag.start, Piece::Tag(tag)));
        }

        pieces.sort_by_key(|(start, _)| *start);
        for (_, piece) in pieces {
            match piece {
                Piece::Php { body, offset } => {
                    self.php.parse_embedded(file_path, body, offset, catalog);
                }
                Piece::Tag(tag) => insert_tag(file_path, tag, catalog),
            }
        }
    }
}

fn insert_tag(file_path: &str, tag: TsTag, catalog: &mut Catalog) {
    let non_literal = |catalog: &mut Catalog| {
        catalog.report(Diagnostic::NonLiteralArgument {
            file: file_path.to_string(),
            line: tag.line,
            marker: "ts".to_string(),
        });
    };

    let msgid = match (tag.attr("msgid"), &tag.body) {
        (Some(value), _) => value.to_string(),
        (None, Some(body)) => body.trim().to_string(),
        (None, None) => return,
    };
    if msgid.is_empty() {
        return;
    }
    if !is_literal(&msgid) {
        non_literal(catalog);
        return;
    }

    let take_attr = |name: &str| -> Result<Option<String>, ()> {
        match tag.attr(name) {
            Some(value) if is_literal(value) => Ok(Some(value.to_string())),
            Some(_) => Err(()),
            None => Ok(None),
        }
    };
    let (msgctxt, msgid_plural) = match (take_attr("context"), take_attr("plural")) {
        (Ok(ctx), Ok(plural)) => (ctx, plural),
        _ => {
            non_literal(catalog);
            return;
        }
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
        line: tag.line,
        comments: Vec::new(),
        flags,
    });
}

/// A value is literal when it contains no Smarty expression syntax.
fn is_literal(value: &str) -> bool {
    !value.contains('{') && !value.contains('$')
}

struct TsTag {
    /// Byte offset of the opening `{ts` in the template.
    start: usize,
    line: usize,
    attrs: Vec<(String, String)>,
    body: Option<String>,
}

impl TsTag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn scan_tags(content: &str) -> Vec<TsTag> {
    let bytes = content.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while let Some(found) = content[i..].find("{ts") {
        let start = i + found;
        let after = start + 3;
        match bytes.get(after) {
            Some(b'}') => {}
            Some(&b) if b.is_ascii_whitespace() => {}
            _ => {
                i = after;
                continue;
            }
        }

        let Some((attrs, tag_end)) = parse_attrs(content, after) else {
            i = after;
            continue;
        };
        let line = line_at(content, start);

        if attrs.iter().any(|(key, _)| key == "msgid") {
            // Self-contained form: the body, if any, is not consumed.
            tags.push(TsTag {
                start,
                line,
                attrs,
                body: None,
            });
            i = tag_end;
            continue;
        }

        match content[tag_end..].find("{/ts}") {
            Some(rel) if !contains_open_tag(&content[tag_end..tag_end + rel]) => {
                tags.push(TsTag {
                    start,
                    line,
                    attrs,
                    body: Some(content[tag_end..tag_end + rel].to_string()),
                });
                i = tag_end + rel + "{/ts}".len();
            }
            // Unclosed block tag (the next close belongs to a later open
            // tag, or there is none): skip it, keep scanning.
            _ => i = tag_end,
        }
    }

    tags
}

/// True if `s` contains a `{ts` open tag (with its `}` or whitespace
/// boundary).
fn contains_open_tag(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while let Some(found) = s[i..].find("{ts") {
        let after = i + found + 3;
        match bytes.get(after) {
            Some(b'}') => return true,
            Some(&b) if b.is_ascii_whitespace() => return true,
            _ => i = after,
        }
    }
    false
}

/// Parse `key=value` attributes up to the closing `}` of the open tag.
///
/// Values may be single-quoted, double-quoted, or bare. Returns the
/// attributes and the index past the `}`, or `None` when the tag is
/// malformed.
fn parse_attrs(content: &str, start: usize) -> Option<(Vec<(String, String)>, usize)> {
    let bytes = content.as_bytes();
    let mut attrs = Vec::new();
    let mut i = start;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let &b = bytes.get(i)?;
        if b == b'}' {
            return Some((attrs, i + 1));
        }

        if !b.is_ascii_alphabetic() && b != b'_' {
            return None;
        }
        let key_start = i;
        while i < bytes.len()
            && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'-')
        {
            i += 1;
        }
        let key = content[key_start..i].to_string();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            return None;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let &quote = bytes.get(i)?;
        let value = if quote == b'\'' || quote == b'"' {
            let value_start = i + 1;
            let mut j = value_start;
            while j < bytes.len() && bytes[j] != quote {
                j += 1;
            }
            if j >= bytes.len() {
                return None;
            }
            i = j + 1;
            content[value_start..j].to_string()
        } else {
            let value_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'}' {
                i += 1;
            }
            content[value_start..i].to_string()
        };

        attrs.push((key, value));
    }
}
