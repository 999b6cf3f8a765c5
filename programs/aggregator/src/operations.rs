//! Typed aggregator operations

use borsh::{BorshDeserialize, BorshSerialize};
use vessel_common::{Address, Operation};

use crate::state::{OperatorUpdate, StoredCall};

/// A call that must succeed
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Call {
    pub target: Address,
    pub payload: Vec<u8>,
}

/// A call with its own failure tolerance
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Call3 {
    pub target: Address,
    pub allow_failure: bool,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Call3Value {
    pub target: Address,
    pub allow_failure: bool,
    pub value: u128,
    pub payload: Vec<u8>,
}

/// Replay of a stored payload
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct StoredCall3 {
    pub target: Address,
    pub index: u64,
    pub allow_failure: bool,
}

/// Outcome of one call; `data` is return data on success, revert data on failure
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CallOutcome {
    pub success: bool,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BlockResults {
    pub block_number: u64,
    pub results: Vec<CallOutcome>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct StoredReturnData {
    pub return_data: Vec<Vec<u8>>,
    /// Log index of each call, in call order
    pub indices: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct StoredOutcomes {
    pub results: Vec<CallOutcome>,
    pub indices: Vec<u64>,
}

macro_rules! operation {
    ($name:ident, $signature:literal, $output:ty) => {
        impl Operation for $name {
            const SIGNATURE: &'static str = $signature;
            type Output = $output;
        }
    };
}

// ===== Batches =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Aggregate {
    pub calls: Vec<Call>,
}
operation!(Aggregate, "aggregate((address,bytes)[])", Vec<Vec<u8>>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TryAggregate {
    pub require_success: bool,
    pub calls: Vec<Call>,
}
operation!(TryAggregate, "tryAggregate(bool,(address,bytes)[])", Vec<CallOutcome>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Aggregate3 {
    pub calls: Vec<Call3>,
}
operation!(Aggregate3, "aggregate3((address,bool,bytes)[])", Vec<CallOutcome>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Aggregate3Value {
    pub calls: Vec<Call3Value>,
}
operation!(Aggregate3Value, "aggregate3Value((address,bool,uint256,bytes)[])", Vec<CallOutcome>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BlockAndAggregate {
    pub calls: Vec<Call>,
}
operation!(BlockAndAggregate, "blockAndAggregate((address,bytes)[])", BlockResults);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TryBlockAndAggregate {
    pub require_success: bool,
    pub calls: Vec<Call>,
}
operation!(TryBlockAndAggregate, "tryBlockAndAggregate(bool,(address,bytes)[])", BlockResults);

// ===== Storing batches =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AggregateAndStore {
    pub calls: Vec<Call>,
}
operation!(AggregateAndStore, "aggregateAndStore((address,bytes)[])", StoredReturnData);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Aggregate3AndStore {
    pub calls: Vec<Call3>,
}
operation!(Aggregate3AndStore, "aggregate3AndStore((address,bool,bytes)[])", StoredOutcomes);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Aggregate3ValueAndStore {
    pub calls: Vec<Call3Value>,
}
operation!(Aggregate3ValueAndStore, "aggregate3ValueAndStore((address,bool,uint256,bytes)[])", StoredOutcomes);

// ===== Replays =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AggregateFromStorage {
    pub target: Address,
    pub index: u64,
}
operation!(AggregateFromStorage, "aggregateFromStorage(address,uint256)", Vec<u8>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AggregateFromStorageBatch {
    pub target: Address,
    pub indices: Vec<u64>,
}
operation!(AggregateFromStorageBatch, "aggregateFromStorage(address,uint256[])", Vec<Vec<u8>>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Aggregate3FromStorage {
    pub calls: Vec<StoredCall3>,
}
operation!(Aggregate3FromStorage, "aggregateFromStorage((address,uint256,bool)[])", Vec<CallOutcome>);

// ===== Ownership and operators =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Owner {}
operation!(Owner, "owner()", Address);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransferOwnership {
    pub new_owner: Address,
}
operation!(TransferOwnership, "transferOwnership(address)", Address);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SetOperators {
    pub updates: Vec<OperatorUpdate>,
}
operation!(SetOperators, "setOperators((address,bool)[])", Vec<Address>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct IsOperator {
    pub account: Address,
}
operation!(IsOperator, "isOperator(address)", bool);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Operators {}
operation!(Operators, "operators()", Vec<Address>);

// ===== Views =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GetBalance {
    pub account: Address,
}
operation!(GetBalance, "getEthBalance(address)", u128);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BlockNumber {}
operation!(BlockNumber, "getBlockNumber()", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ChainId {}
operation!(ChainId, "getChainId()", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Timestamp {}
operation!(Timestamp, "getCurrentBlockTimestamp()", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct StoredCallCount {}
operation!(StoredCallCount, "storedCallCount()", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GetStoredCall {
    pub index: u64,
}
operation!(GetStoredCall, "storedCall(uint256)", StoredCall);
