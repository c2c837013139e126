//! Settings-file dialect parser (`*.setting.php`).
//!
//! Settings metadata files are declarative PHP arrays. Marker calls inside
//! them are extracted by the composed [`PhpParser`]; in addition, bare
//! literal values of the well-known translatable keys (`title`,
//! `description`) are extracted with a comment naming the key, since
//! settings metadata rarely wraps them in a marker call.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Catalog, Occurrence};
use crate::parsers::Parse;
use crate::parsers::php::{self, PhpParser};
use crate::utils::line_at;

static TRANSLATABLE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"](title|description)['"]\s*=>\s*"#).expect("translatable key pattern")
});

/// Parser for PHP settings metadata files.
#[derive(Debug, Clone, Default)]
pub struct SettingsParser {
    php: PhpParser,
}

impl SettingsParser {
    pub fn new(php: PhpParser) -> Self {
        Self { php }
    }
}

impl Parse for SettingsParser {
    fn parse(&self, file_path: &str, content: &str, catalog: &mut Catalog) {
        self.php.parse_embedded(file_path, content, 0, catalog);

        for captures in TRANSLATABLE_KEY.captures_iter(content) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let value_start = whole.end();
            // Marker-call values were already handled by the PHP pass.
            if !matches!(content.as_bytes().get(value_start), Some(b'\'') | Some(b'"')) {
                continue;
            }
            let Some((value, _)) = php::read_string(content, value_start) else {
                continue;
            };
            let key = &captures[1];

            catalog.insert(Occurrence {
                msgid: value,
                file: file_path.to_string(),
                line: line_at(content, whole.start()),
                comments: vec![format!("setting {}", key)],
                ..Default::default()
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(content: &str) -> Catalog {
        let mut catalog = Catalog::new(".");
        SettingsParser::default().parse("mail.setting.php", content, &mut catalog);
        catalog
    }

    fn msgids(catalog: &Catalog) -> Vec<&str> {
        catalog.entries().iter().map(|e| e.msgid.as_str()).collect()
    }

    #[test]
    fn test_bare_title_and_description_extracted_with_comments() {
        let content = concat!(
            "<?php\n",
            "return array(\n",
            "  'mailer_batch_limit' => array(\n",
            "    'title' => 'Mailer Batch Limit',\n",
            "    'description' => \"Total emails to send per batch\",\n",
            "    'default' => 0,\n",
            "  ),\n",
            ");\n",
        );
        let catalog = parse(content);

        assert_eq!(
            msgids(&catalog),
            vec!["Mailer Batch Limit", "Total emails to send per batch"]
        );
        assert_eq!(catalog.entries()[0].comments, vec!["setting title"]);
        assert_eq!(catalog.entries()[0].references[0].line, 4);
        assert_eq!(catalog.entries()[1].comments, vec!["setting description"]);
    }

    #[test]
    fn test_marker_wrapped_value_goes_through_php_pass_once() {
        let content = "<?php\nreturn array(\n  'title' => ts('Wrapped Title'),\n);\n";
        let catalog = parse(content);

        assert_eq!(msgids(&catalog), vec!["Wrapped Title"]);
        // From the marker call, not the key scan: no key comment attached.
        assert!(catalog.entries()[0].comments.is_empty());
        assert_eq!(catalog.entries()[0].references.len(), 1);
    }

    #[test]
    fn test_other_keys_are_not_extracted() {
        let content = "<?php return array('name' => 'mailer_limit', 'group' => 'mailing');";
        let catalog = parse(content);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let content = "<?php return array('title' => '');";
        let catalog = parse(content);
        assert!(catalog.is_empty());
    }
}
