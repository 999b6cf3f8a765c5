//! Runtime configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::meter::ComputeMeter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Chain id accounts compare their identity binding against
    pub chain_id: u64,

    /// Computation units available to one top-level invocation
    pub computation_budget: u64,

    /// Maximum nesting of call frames below the top-level frame
    pub max_call_depth: u32,

    /// Capacity of the broadcast buffer for committed events
    pub event_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            computation_budget: ComputeMeter::DEFAULT_BUDGET,
            max_call_depth: 64,
            event_buffer: 1024,
        }
    }
}

impl RuntimeConfig {
    /// Load from `VESSEL_*` environment variables; unset ones keep their defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            chain_id: parse_var(&lookup, "VESSEL_CHAIN_ID", defaults.chain_id)?,
            computation_budget: parse_var(
                &lookup,
                "VESSEL_COMPUTATION_BUDGET",
                defaults.computation_budget,
            )?,
            max_call_depth: parse_var(&lookup, "VESSEL_MAX_CALL_DEPTH", defaults.max_call_depth)?,
            event_buffer: parse_var(&lookup, "VESSEL_EVENT_BUFFER", defaults.event_buffer)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.computation_budget == 0 {
            return Err(ConfigError::Invalid("computation_budget must be positive".into()));
        }
        if self.max_call_depth == 0 {
            return Err(ConfigError::Invalid("max_call_depth must be positive".into()));
        }
        if self.event_buffer == 0 {
            return Err(ConfigError::Invalid("event_buffer must be positive".into()));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
