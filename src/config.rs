use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::subsets::MAX_ACTIVE_SETS;

/// Tuning for a [`Session`](crate::state::Session).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Leading sets marked active when a dataset is loaded.
    pub default_active_sets: usize,
    /// Upper bound on simultaneously active sets; enumeration emits 2^n - 1 records.
    /// Clamped to [`MAX_ACTIVE_SETS`].
    pub max_active_sets: usize,
}

impl SessionConfig {
    /// Limit `max_active_sets` to what enumeration supports.
    pub fn clamped(mut self) -> Self {
        if self.max_active_sets > MAX_ACTIVE_SETS {
            log::warn!(
                "max_active_sets {} exceeds the limit of {MAX_ACTIVE_SETS}, clamping",
                self.max_active_sets
            );
            self.max_active_sets = MAX_ACTIVE_SETS;
        }
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_active_sets: 3,
            max_active_sets: 20,
        }
    }
}

/// Settings for the command-line front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    /// Catalog index of the dataset to open.
    pub dataset: usize,
    /// Emit JSON instead of a text report.
    pub json: bool,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: AppConfig =
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config.session = config.session.clamped();
        Ok(config)
    }
}
