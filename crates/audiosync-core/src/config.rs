//! Alignment configuration
//!
//! Stored as JSON. Every field has a default, so partial files are accepted
//! and a missing or unreadable file falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::correlate::{CorrelationMethod, DEFAULT_DIRECT_MAX_PRODUCT};
use crate::audio::resample::ResampleConfig;

fn default_direct_max_product() -> usize {
    DEFAULT_DIRECT_MAX_PRODUCT
}

/// Tunables for the alignment pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Correlation implementation
    #[serde(default)]
    pub correlation: CorrelationMethod,
    /// Largest `len(reference) * len(target)` correlated directly under `auto`
    #[serde(default = "default_direct_max_product")]
    pub direct_max_product: usize,
    /// Resampler quality
    #[serde(default)]
    pub resample: ResampleConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            correlation: CorrelationMethod::default(),
            direct_max_product: default_direct_max_product(),
            resample: ResampleConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Load config from `path`, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded sync config");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse sync config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No sync config found, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating parent directories if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Sync config saved");
        Ok(())
    }
}
