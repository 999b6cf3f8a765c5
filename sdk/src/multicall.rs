//! Builder for aggregator batches

use vessel_aggregator::{
    Aggregate, Aggregate3, Aggregate3AndStore, Aggregate3Value, Aggregate3ValueAndStore, AggregateAndStore, Call,
    Call3, Call3Value, CallOutcome, TryAggregate,
};
use vessel_common::{decode_output, Address, Operation, Revert};

#[derive(Debug, Clone)]
struct PendingCall {
    target: Address,
    allow_failure: bool,
    value: u128,
    payload: Vec<u8>,
}

/// Collects calls once and renders them into any aggregate form
#[derive(Debug, Clone, Default)]
pub struct Multicall {
    calls: Vec<PendingCall>,
}

impl Multicall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call<O: Operation>(self, target: Address, op: &O) -> Self {
        self.raw(target, op.encode(), false, 0)
    }

    /// A call whose failure is reported instead of aborting the batch
    pub fn try_call<O: Operation>(self, target: Address, op: &O) -> Self {
        self.raw(target, op.encode(), true, 0)
    }

    pub fn raw(mut self, target: Address, payload: Vec<u8>, allow_failure: bool, value: u128) -> Self {
        self.calls.push(PendingCall { target, allow_failure, value, payload });
        self
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Sum of per-call values, which `aggregate3Value` must be sent with
    pub fn total_value(&self) -> u128 {
        self.calls.iter().fold(0u128, |sum, c| sum.saturating_add(c.value))
    }

    fn plain(&self) -> Vec<Call> {
        self.calls
            .iter()
            .map(|c| Call { target: c.target, payload: c.payload.clone() })
            .collect()
    }

    fn tolerant(&self) -> Vec<Call3> {
        self.calls
            .iter()
            .map(|c| Call3 { target: c.target, allow_failure: c.allow_failure, payload: c.payload.clone() })
            .collect()
    }

    fn valued(&self) -> Vec<Call3Value> {
        self.calls
            .iter()
            .map(|c| Call3Value {
                target: c.target,
                allow_failure: c.allow_failure,
                value: c.value,
                payload: c.payload.clone(),
            })
            .collect()
    }

    pub fn aggregate(&self) -> Aggregate {
        Aggregate { calls: self.plain() }
    }

    pub fn try_aggregate(&self, require_success: bool) -> TryAggregate {
        TryAggregate { require_success, calls: self.plain() }
    }

    pub fn aggregate3(&self) -> Aggregate3 {
        Aggregate3 { calls: self.tolerant() }
    }

    pub fn aggregate3_value(&self) -> Aggregate3Value {
        Aggregate3Value { calls: self.valued() }
    }

    pub fn aggregate_and_store(&self) -> AggregateAndStore {
        AggregateAndStore { calls: self.plain() }
    }

    pub fn aggregate3_and_store(&self) -> Aggregate3AndStore {
        Aggregate3AndStore { calls: self.tolerant() }
    }

    pub fn aggregate3_value_and_store(&self) -> Aggregate3ValueAndStore {
        Aggregate3ValueAndStore { calls: self.valued() }
    }
}

/// Typed view of one outcome: the decoded output, or the raw revert
pub fn decode_outcome<O: Operation>(outcome: &CallOutcome) -> Result<O::Output, Revert> {
    if outcome.success {
        decode_output(&outcome.data)
    } else {
        Err(Revert::new(outcome.data.clone()))
    }
}
