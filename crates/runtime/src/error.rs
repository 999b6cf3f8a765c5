use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;
use vessel_common::{Address, Revert, RevertError};

// ================================
// Host Errors
// ================================

/// Failures raised by the host itself rather than by contract code
#[derive(Error, Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum HostError {
    /// Halts the whole top-level invocation; no frame can catch it
    #[error("Computation budget exceeded: used {used} of {budget}")]
    ComputeBudgetExceeded { used: u64, budget: u64 },

    #[error("Call depth exceeded maximum of {0}")]
    CallDepthExceeded(u32),

    #[error("Insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("Code already deployed at {0}")]
    AlreadyDeployed(Address),

    #[error("Cannot deploy code at the zero address")]
    ZeroAddressDeploy,
}

impl RevertError for HostError {
    const DOMAIN: &'static str = "HostError";
}

impl From<HostError> for Revert {
    fn from(err: HostError) -> Self {
        Revert::error(&err)
    }
}

// ================================
// Configuration Errors
// ================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
