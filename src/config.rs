use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::discover::DEFAULT_EXCLUDES;

pub const CONFIG_FILE_NAME: &str = ".potxrc.json";

/// Project configuration file. Every field is optional; CLI flags override
/// whatever the file provides.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory names skipped during discovery.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
    /// Header file prepended to newly created catalogs.
    #[serde(default)]
    pub header: Option<String>,
    /// Default msgctxt for entries without an explicit context.
    #[serde(default)]
    pub msgctxt: Option<String>,
}

fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excludes: default_excludes(),
            header: None,
            msgctxt: None,
        }
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load the nearest config file above `start_dir`, or defaults when none
/// exists. A file that exists but does not parse is an error.
pub fn load_config(start_dir: &Path) -> Result<Config> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
