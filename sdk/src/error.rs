use thiserror::Error;
use vessel_account::AccountError;
use vessel_aggregator::AggregatorError;
use vessel_common::{CodecError, Revert};
use vessel_runtime::HostError;

/// A failed invocation, classified by the domain of its revert data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("Account error: {0}")]
    Account(AccountError),

    #[error("Aggregator error: {0}")]
    Aggregator(AggregatorError),

    #[error("Host error: {0}")]
    Host(HostError),

    #[error("Codec error: {0}")]
    Codec(CodecError),

    #[error("Reverted: {0}")]
    Reason(String),

    /// Revert data from a domain this crate does not know, or none at all
    #[error("Reverted: {0}")]
    Reverted(Revert),
}

impl From<Revert> for SdkError {
    fn from(revert: Revert) -> Self {
        if let Some(err) = revert.decode::<AccountError>() {
            return Self::Account(err);
        }
        if let Some(err) = revert.decode::<AggregatorError>() {
            return Self::Aggregator(err);
        }
        if let Some(err) = revert.decode::<HostError>() {
            return Self::Host(err);
        }
        if let Some(err) = revert.decode::<CodecError>() {
            return Self::Codec(err);
        }
        if let Some(reason) = revert.as_reason() {
            return Self::Reason(reason);
        }
        Self::Reverted(revert)
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
