//! Vessel Aggregator
//!
//! Batch front end for calls against many accounts. Callers must be on the
//! operator allow-list kept by the aggregator's owner; that list is separate
//! from any account's owner or roles. Calls run in order from the
//! aggregator's own address, and payloads can be stored in an append-only
//! log for later replay by index.

use std::collections::BTreeSet;

use tracing::info;
use vessel_common::{decode_args, Address, CallResult, CodecError, Revert, SELECTOR_LEN};
use vessel_runtime::{Contract, Env, MethodTable};

pub mod call_log;
pub mod error;
pub mod events;
pub mod instructions;
pub mod operations;
pub mod state;

pub use error::AggregatorError;
pub use operations::*;
pub use state::{AggregatorInit, OperatorUpdate, StoredCall};

pub struct Aggregator {
    methods: MethodTable,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        let mut methods = MethodTable::new();
        methods
            .register::<Aggregate>()
            .register::<TryAggregate>()
            .register::<Aggregate3>()
            .register::<Aggregate3Value>()
            .register::<BlockAndAggregate>()
            .register::<TryBlockAndAggregate>()
            .register::<AggregateAndStore>()
            .register::<Aggregate3AndStore>()
            .register::<Aggregate3ValueAndStore>()
            .register::<AggregateFromStorage>()
            .register::<AggregateFromStorageBatch>()
            .register::<Aggregate3FromStorage>()
            .register::<Owner>()
            .register::<TransferOwnership>()
            .register::<SetOperators>()
            .register::<IsOperator>()
            .register::<Operators>()
            .register::<GetBalance>()
            .register::<BlockNumber>()
            .register::<ChainId>()
            .register::<Timestamp>()
            .register::<StoredCallCount>()
            .register::<GetStoredCall>();
        Self { methods }
    }
}

impl Contract for Aggregator {
    fn name(&self) -> &str {
        "vessel-aggregator"
    }

    fn construct(&self, env: &mut Env<'_>, args: &[u8]) -> CallResult {
        let init: AggregatorInit = decode_args(args)?;
        if init.owner.is_zero() || init.operators.iter().any(|o| o.is_zero()) {
            return Err(AggregatorError::ZeroAddress.into());
        }
        info!("Creating aggregator {} owned by {} with {} operators", env.address(), init.owner, init.operators.len());
        state::store_owner(env, &init.owner)?;
        let operators: BTreeSet<Address> = init.operators.iter().copied().collect();
        state::store_operators(env, &operators)?;
        Ok(Vec::new())
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult {
        match self.methods.dispatch(env, input) {
            Some(result) => result,
            None if input.is_empty() => Ok(Vec::new()),
            None if input.len() < SELECTOR_LEN => Err(CodecError::MissingSelector.into()),
            None => Err(Revert::empty()),
        }
    }
}
