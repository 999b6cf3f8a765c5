//! Vessel SDK
//!
//! Thin typed layer over the account and aggregator operations:
//! - deployment helpers
//! - clients that send one operation per top-level invocation
//! - batch builders for mutations, overrides, roles and multicalls
//! - revert classification into [`SdkError`]

pub mod batches;
pub mod client;
pub mod error;
pub mod multicall;

pub use batches::{MutationBatch, OverrideBatch, RoleBatch};
pub use client::{deploy_account, deploy_aggregator, watch, AccountClient, AggregatorClient};
pub use error::{Result, SdkError};
pub use multicall::{decode_outcome, Multicall};
