//! Engine configuration
//!
//! Every field has a default, so a YAML file only needs the values it
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Number of selection snapshots kept for undo/redo
    pub history_capacity: usize,
    /// Quiet period before a session snapshot is written
    pub persist_debounce_ms: u64,
    /// Snapshots older than this are discarded on read
    pub session_max_age_secs: u64,
    /// Identical criteria issued within this window are not refetched
    pub refetch_dedup_ms: u64,
    /// Opacity when neither hover nor selection highlighting applies
    pub baseline_opacity: f32,
    /// Score column active when no session state says otherwise
    pub default_score_column: String,
    /// Prefix for every session store key
    pub session_key_prefix: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            persist_debounce_ms: 450,
            session_max_age_secs: 24 * 60 * 60,
            refetch_dedup_ms: 1000,
            baseline_opacity: 0.7,
            default_score_column: "cv_score".to_string(),
            session_key_prefix: "inspector".to_string(),
        }
    }
}

impl InspectorConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn session_max_age(&self) -> Duration {
        Duration::from_secs(self.session_max_age_secs)
    }

    pub fn refetch_dedup(&self) -> Duration {
        Duration::from_millis(self.refetch_dedup_ms)
    }

    /// Clamp values into their valid ranges
    pub fn normalized(mut self) -> Self {
        self.history_capacity = self.history_capacity.max(1);
        self.baseline_opacity = self.baseline_opacity.clamp(0.0, 1.0);
        self
    }
}
