//! Startup configuration
//!
//! Defaults for the synth controls, optionally overridden by a JSON document
//! in the `POLY_KEYS_CONFIG` environment variable, e.g.
//!
//! ```text
//! POLY_KEYS_CONFIG='{"params": {"waveform": "square", "volume_db": -6.0}}'
//! ```

use serde::{Deserialize, Serialize};

use crate::core::params::SynthParams;
use crate::core::synth::{DEFAULT_POLYPHONY, MAX_POLYPHONY};
use crate::error::{Error, Result};

pub const CONFIG_ENV_VAR: &str = "POLY_KEYS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub params: SynthParams,
    pub max_polyphony: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            params: SynthParams::default(),
            max_polyphony: DEFAULT_POLYPHONY,
        }
    }
}

impl AppConfig {
    /// Read the override from the environment; defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(json) => Self::from_json(&json),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_POLYPHONY).contains(&self.max_polyphony) {
            return Err(Error::Config(format!(
                "max_polyphony must be between 1 and {}, got {}",
                MAX_POLYPHONY, self.max_polyphony
            )));
        }
        self.params.validate()
    }
}
