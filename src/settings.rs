//! Persistent search options.
//!
//! The core never reads or writes state; this store is the narrow
//! collaborator that hands it a valid [`SearchOptions`] value. Options
//! live as pretty-printed JSON in the platform data directory. A missing
//! or unreadable file yields the defaults, so `load` cannot fail.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::types::SearchOptions;

const SETTINGS_FILE: &str = "settings.json";

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn default_location() -> Self {
        Self::at(crate::default_data_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored options, falling back to defaults when the file is
    /// missing or does not parse.
    pub fn load(&self) -> SearchOptions {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(options) => options,
                Err(err) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %err,
                        "unreadable settings, using defaults"
                    );
                    SearchOptions::default()
                }
            },
            Err(_) => SearchOptions::default(),
        }
    }

    pub fn save(&self, options: &SearchOptions) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(options)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
