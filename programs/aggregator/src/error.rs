//! Aggregator errors

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;
use vessel_common::{Address, Revert, RevertError};

#[derive(Error, Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum AggregatorError {
    #[error("Caller {0} is not the aggregator owner")]
    NotOwner(Address),

    #[error("Caller {0} is not an operator")]
    NotOperator(Address),

    #[error("Zero address not allowed")]
    ZeroAddress,

    #[error("Attached value {attached} does not match call values {required}")]
    ValueMismatch { attached: u128, required: u128 },

    #[error("Call {index} failed without a reason")]
    CallFailed { index: u32 },

    #[error("Stored call {index} out of range (log holds {len})")]
    OutOfRange { index: u64, len: u64 },
}

impl RevertError for AggregatorError {
    const DOMAIN: &'static str = "AggregatorError";
}

impl From<AggregatorError> for Revert {
    fn from(err: AggregatorError) -> Self {
        Revert::error(&err)
    }
}
