//! JSON configuration for the frame pipeline.

use armor_vision_lightbar::LightBarSearchParams;
use armor_vision_matching::ArmorMatchParams;
use armor_vision_tracking::TrackerParams;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::ChannelDifferenceMask;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Every tunable of the pipeline. Missing fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub color_mask: ChannelDifferenceMask,
    pub light_bar: LightBarSearchParams,
    pub matching: ArmorMatchParams,
    pub tracker: TrackerParams,
    /// Size of a dedicated rayon pool for the light bar search; `None` uses
    /// the global pool.
    pub worker_threads: Option<usize>,
}

impl PipelineConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
