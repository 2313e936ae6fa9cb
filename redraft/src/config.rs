//! Engine configuration loaded from a TOML file.
//!
//! Config errors are soft failures: a missing or unparsable file falls back
//! to defaults (with a note on stderr for parse errors), never preventing
//! startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Tunables for the revision engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where the shared WAL-mode SQLite database lives.
    pub db_path: String,
    /// Cap on the diff DP table (`old_lines * new_lines`) before falling
    /// back to whole-document replacement.
    pub max_diff_cells: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: ".redraft/documents.db".to_owned(),
            max_diff_cells: redraft_diff::DEFAULT_MAX_CELLS,
        }
    }
}

impl EngineConfig {
    /// Returns the path to the engine config file.
    ///
    /// Prefers `$XDG_CONFIG_HOME/redraft/config.toml`; falls back to
    /// `~/.config/redraft/config.toml` when the env var is absent.
    pub fn config_path() -> PathBuf {
        let base = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
            .unwrap_or_else(|| PathBuf::from(".config"));
        base.join("redraft").join("config.toml")
    }

    /// Loads config from the default location.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Loads config from `path`.
    ///
    /// Returns defaults if the file does not exist or cannot be parsed.
    /// Never panics — config errors are soft failures printed to stderr.
    pub fn load_from(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("redraft: config parse error in {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
