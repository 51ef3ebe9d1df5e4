//! Configuration for butterfly-path
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! [coordinates]
//! scale = 1000000.0
//!
//! [traffic]
//! far_decay_length = 30000.0
//! report_threshold = 4000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Error, Result};
use crate::core::position::CoordinateScale;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fixed-point coordinate encoding used for distances
    pub coordinates: CoordinateScale,
    /// Traffic load propagation parameters
    pub traffic: TrafficConfig,
}

/// Parameters for flushing accumulated traffic load to an origin element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Cost units over which far traffic decays by a factor e
    pub far_decay_length: f64,
    /// Cost units over which near traffic decays by a factor e
    pub near_decay_length: f64,
    pub far_weight: f64,
    pub near_weight: f64,
    /// Edge loads above this value are reported to the sink
    pub report_threshold: i32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            far_decay_length: 30_000.0,
            near_decay_length: 3_000.0,
            far_weight: 0.5,
            near_weight: 0.5,
            report_threshold: 4_000,
        }
    }
}

impl Config {
    /// Load and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.coordinates.scale.is_nan() || self.coordinates.scale <= 0.0 {
            return Err(Error::Config(format!(
                "coordinates.scale must be positive, got {}",
                self.coordinates.scale
            )));
        }
        let decay = [self.traffic.far_decay_length, self.traffic.near_decay_length];
        if decay.iter().any(|d| d.is_nan() || *d <= 0.0) {
            return Err(Error::Config(
                "traffic decay lengths must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
