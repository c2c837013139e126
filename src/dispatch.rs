//! File-type dispatch: decide which dialect parser handles a file.
//!
//! Extension matching comes first; extensionless PHP scripts are recovered
//! by a cheap content sniff (`<?php` prefix or a php shebang), so a full
//! parse is never needed to route a file. Unrecognized files and `~`
//! backups get no parser and are silently skipped by the driver.

use std::sync::LazyLock;

use regex::Regex;

use crate::parsers::{Parser, PhpParser, ScriptParser, SettingsParser, SmartyParser};

static PHP_SHEBANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#![^\n]*php").expect("shebang pattern"));

/// One instance of every dialect parser, built once per run.
pub struct ParserSet {
    php: Parser,
    smarty: Parser,
    script: Parser,
    settings: Parser,
}

impl ParserSet {
    pub fn new() -> Self {
        let php = PhpParser::default();
        Self {
            smarty: Parser::Smarty(SmartyParser::new(php.clone())),
            settings: Parser::Settings(SettingsParser::new(php.clone())),
            php: Parser::Php(php),
            script: Parser::Script(ScriptParser::default()),
        }
    }

    /// Pick the parser for `path`, or `None` when the file should be
    /// skipped. First match wins; extension matching is case-sensitive.
    pub fn select(&self, path: &str, content: &str) -> Option<&Parser> {
        if path.ends_with('~') {
            return None;
        }
        if path.ends_with(".js") {
            return Some(&self.script);
        }
        if path.ends_with(".html") {
            return Some(&self.script);
        }
        if path.ends_with(".setting.php") {
            return Some(&self.settings);
        }
        if path.ends_with(".tpl") || path.ends_with(".smarty") {
            return Some(&self.smarty);
        }
        if path.ends_with(".php") || content.starts_with("<?php") || PHP_SHEBANG.is_match(content)
        {
            return Some(&self.php);
        }
        None
    }
}

impl Default for ParserSet {
    fn default() -> Self {
        Self::new()
    }
}
