//! Crate configuration with TOML loading and sensible defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::{Result, TandemError};

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_players() -> usize {
    3
}

/// Tuning knobs for the sync coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncTuning {
    /// Debounce window for inferred seeks, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl SyncTuning {
    /// The debounce window as a duration.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SyncTuning {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Limits on the player set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerLimits {
    /// Maximum number of simultaneous players in a session.
    #[serde(default = "default_max_players")]
    pub max: usize,
}

impl Default for PlayerLimits {
    fn default() -> Self {
        Self {
            max: default_max_players(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TandemConfig {
    /// Sync coordinator tuning.
    #[serde(default)]
    pub sync: SyncTuning,

    /// Player set limits.
    #[serde(default)]
    pub players: PlayerLimits,
}

impl TandemConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    /// Returns `TandemError::Io` if the file exists but cannot be read, and
    /// `TandemError::TomlParse` if its contents are not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| TandemError::toml_parse(e, Some(path)))
    }
}
