// Config - console settings file
//
// Optional JSON file; every field has a default so a partial file works.
// Command-line flags override whatever the file sets.

use crate::query::TierFilter;
use crate::sort::SortKey;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Record snapshot to open (.json or .csv)
    #[serde(default)]
    pub snapshot: Option<PathBuf>,

    /// Where exports are written (default: current directory)
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Initial sort key for a new session
    #[serde(default)]
    pub default_sort: SortKey,

    /// Initial tier filter for a new session
    #[serde(default)]
    pub default_tier: TierFilter,

    /// Log file used while the console owns the terminal
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            snapshot: None,
            export_dir: default_export_dir(),
            default_sort: SortKey::default(),
            default_tier: TierFilter::default(),
            log_file: None,
        }
    }
}

impl ConsoleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
