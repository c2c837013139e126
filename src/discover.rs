//! Recursive expansion of input paths into the list of candidate files.
//!
//! Callers hand over any mix of files and directories; discovery sorts and
//! deduplicates the inputs first so the resulting file list is identical
//! regardless of the order paths were supplied in. Directories whose base
//! name is in the exclusion set are never descended into.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::io::BufRead;
use std::path::Path;

use colored::Colorize;
use walkdir::WalkDir;

/// Directory names never descended into (dependency/vendor trees).
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".svn",
    "node_modules",
    "bower_components",
    "vendor",
];

/// Input token requesting extra path names from stdin.
pub const STDIN_TOKEN: &str = "-";

/// Expand `paths` into a sorted, deduplicated list of existing files.
///
/// Nonexistent paths are dropped (reported on stderr in verbose mode);
/// directories are walked in file-name order with excluded directories
/// pruned before descent. Symlinks are followed; walkdir's ancestor check
/// keeps link cycles from recursing forever.
pub fn discover(paths: &[String], excludes: &[String], verbose: bool) -> Vec<String> {
    let mut inputs: Vec<&str> = paths.iter().map(|p| trim_trailing_slash(p)).collect();
    inputs.sort_unstable();
    inputs.dedup();

    let mut files: BTreeSet<String> = BTreeSet::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            walk_dir(input, excludes, verbose, &mut files);
        } else if path.is_file() {
            files.insert(input.to_string());
        } else if verbose {
            eprintln!(
                "{} Path does not exist: {}",
                "warning:".bold().yellow(),
                input
            );
        }
    }

    files.into_iter().collect()
}

fn walk_dir(root: &str, excludes: &[String], verbose: bool, files: &mut BTreeSet<String>) {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && is_excluded(entry.file_name(), excludes)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), err);
                }
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.insert(entry.path().to_string_lossy().into_owned());
        }
    }
}

fn is_excluded(name: &OsStr, excludes: &[String]) -> bool {
    name.to_str()
        .is_some_and(|name| excludes.iter().any(|e| e == name))
}

fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Read a newline-delimited path list (the `-` stdin side channel).
///
/// Blank lines and surrounding whitespace are dropped.
pub fn read_path_list(reader: impl BufRead) -> Vec<String> {
    reader
        .lines()
        .map_while(Result::ok)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn defaults() -> Vec<String> {
        DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_discover_recurses_and_sorts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        File::create(root.join("sub/b.php")).unwrap();
        File::create(root.join("a.php")).unwrap();

        let files = discover(
            &[root.to_string_lossy().into_owned()],
            &defaults(),
            false,
        );

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.php"));
        assert!(files[1].ends_with("sub/b.php"));
    }

    #[test]
    fn test_discover_never_descends_into_excluded_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules/dep")).unwrap();
        File::create(root.join("node_modules/dep/lib.js")).unwrap();
        fs::create_dir(root.join("vendor")).unwrap();
        File::create(root.join("vendor/auto.php")).unwrap();
        File::create(root.join("app.php")).unwrap();

        let files = discover(
            &[root.to_string_lossy().into_owned()],
            &defaults(),
            false,
        );

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.php"));
    }

    #[test]
    fn test_discover_is_order_independent() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        File::create(root.join("a.php")).unwrap();
        File::create(root.join("b.php")).unwrap();
        let a = root.join("a.php").to_string_lossy().into_owned();
        let b = root.join("b.php").to_string_lossy().into_owned();

        let forward = discover(&[a.clone(), b.clone()], &defaults(), false);
        let backward = discover(&[b, a], &defaults(), false);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_discover_dedups_overlapping_inputs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        File::create(root.join("a.php")).unwrap();
        let as_file = root.join("a.php").to_string_lossy().into_owned();
        let as_dir = root.to_string_lossy().into_owned();

        let files = discover(&[as_dir, as_file], &defaults(), false);

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_drops_nonexistent_paths() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        File::create(root.join("a.php")).unwrap();

        let files = discover(
            &[
                root.join("a.php").to_string_lossy().into_owned(),
                root.join("missing.php").to_string_lossy().into_owned(),
            ],
            &defaults(),
            false,
        );

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        File::create(root.join("a.php")).unwrap();
        let plain = root.to_string_lossy().into_owned();
        let slashed = format!("{}/", plain);

        let files = discover(&[plain.clone(), slashed], &defaults(), false);

        assert_eq!(files, discover(&[plain], &defaults(), false));
    }

    #[test]
    fn test_excluded_root_is_skipped_entirely() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("vendor");
        fs::create_dir(&root).unwrap();
        File::create(root.join("auto.php")).unwrap();

        let files = discover(
            &[root.to_string_lossy().into_owned()],
            &defaults(),
            false,
        );

        assert!(files.is_empty());
    }

    #[test]
    fn test_read_path_list() {
        let input = "a.php\n\n  b.tpl  \nc.js\n";
        assert_eq!(
            read_path_list(input.as_bytes()),
            vec!["a.php", "b.tpl", "c.js"]
        );
    }
}
