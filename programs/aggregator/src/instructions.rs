//! Aggregator operation handlers
//!
//! Every batch form funnels through [`dispatch_call`]: a failing call either
//! aborts the batch (its revert data bubbles up, or `CallFailed` when it gave
//! none) or is captured as a `(false, data)` outcome, depending on the
//! tolerance the caller asked for.

use tracing::{debug, info};
use vessel_common::{Address, Revert};
use vessel_runtime::{Env, Method};

use crate::call_log;
use crate::error::AggregatorError;
use crate::events::{OperatorSet, OwnershipTransferred};
use crate::operations::*;
use crate::state::{self, StoredCall};

// ================================
// Authorization
// ================================

fn require_operator(env: &mut Env<'_>) -> Result<(), Revert> {
    let caller = env.caller();
    if state::load_operators(env)?.contains(&caller) {
        return Ok(());
    }
    debug!("Rejecting non-operator {}", caller);
    Err(AggregatorError::NotOperator(caller).into())
}

fn require_owner(env: &mut Env<'_>) -> Result<(), Revert> {
    let caller = env.caller();
    if state::load_owner(env)? == caller {
        return Ok(());
    }
    Err(AggregatorError::NotOwner(caller).into())
}

// ================================
// Call Execution
// ================================

fn dispatch_call(
    env: &mut Env<'_>,
    position: usize,
    target: Address,
    value: u128,
    payload: &[u8],
    allow_failure: bool,
) -> Result<CallOutcome, Revert> {
    match env.call(target, value, payload) {
        Ok(data) => Ok(CallOutcome { success: true, data }),
        Err(revert) if allow_failure => {
            debug!("Call {} to {} failed, continuing: {}", position, target, revert);
            Ok(CallOutcome { success: false, data: revert.into_data() })
        }
        Err(revert) => {
            let index = u32::try_from(position).unwrap_or(u32::MAX);
            Err(revert.or_else(AggregatorError::CallFailed { index }))
        }
    }
}

/// Forms that forward no value must not strand any in the aggregator
fn require_no_value(env: &Env<'_>) -> Result<(), Revert> {
    let attached = env.value();
    if attached != 0 {
        return Err(AggregatorError::ValueMismatch { attached, required: 0 }.into());
    }
    Ok(())
}

fn run_calls(env: &mut Env<'_>, calls: &[Call], allow_failure: bool) -> Result<Vec<CallOutcome>, Revert> {
    require_no_value(env)?;
    calls
        .iter()
        .enumerate()
        .map(|(i, call)| dispatch_call(env, i, call.target, 0, &call.payload, allow_failure))
        .collect()
}

fn run_calls3(env: &mut Env<'_>, calls: &[Call3]) -> Result<Vec<CallOutcome>, Revert> {
    require_no_value(env)?;
    calls
        .iter()
        .enumerate()
        .map(|(i, call)| dispatch_call(env, i, call.target, 0, &call.payload, call.allow_failure))
        .collect()
}

fn run_calls3_value(env: &mut Env<'_>, calls: &[Call3Value]) -> Result<Vec<CallOutcome>, Revert> {
    let attached = env.value();
    let required = calls
        .iter()
        .try_fold(0u128, |sum, call| sum.checked_add(call.value))
        .ok_or(AggregatorError::ValueMismatch { attached, required: u128::MAX })?;
    if required != attached {
        return Err(AggregatorError::ValueMismatch { attached, required }.into());
    }
    calls
        .iter()
        .enumerate()
        .map(|(i, call)| dispatch_call(env, i, call.target, call.value, &call.payload, call.allow_failure))
        .collect()
}

fn return_data(outcomes: Vec<CallOutcome>) -> Vec<Vec<u8>> {
    outcomes.into_iter().map(|o| o.data).collect()
}

fn store_all<'a>(env: &mut Env<'_>, payloads: impl Iterator<Item = &'a [u8]>) -> Result<Vec<u64>, Revert> {
    payloads.map(|payload| call_log::append(env, payload)).collect()
}

// ================================
// Batches
// ================================

impl Method for Aggregate {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<Vec<u8>>, Revert> {
        require_operator(env)?;
        Ok(return_data(run_calls(env, &op.calls, false)?))
    }
}

impl Method for TryAggregate {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<CallOutcome>, Revert> {
        require_operator(env)?;
        run_calls(env, &op.calls, !op.require_success)
    }
}

impl Method for Aggregate3 {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<CallOutcome>, Revert> {
        require_operator(env)?;
        run_calls3(env, &op.calls)
    }
}

impl Method for Aggregate3Value {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<CallOutcome>, Revert> {
        require_operator(env)?;
        run_calls3_value(env, &op.calls)
    }
}

impl Method for BlockAndAggregate {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<BlockResults, Revert> {
        TryBlockAndAggregate::handle(env, TryBlockAndAggregate { require_success: true, calls: op.calls })
    }
}

impl Method for TryBlockAndAggregate {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<BlockResults, Revert> {
        require_operator(env)?;
        let results = run_calls(env, &op.calls, !op.require_success)?;
        Ok(BlockResults { block_number: env.block_number(), results })
    }
}

// ================================
// Storing Batches
// ================================

impl Method for AggregateAndStore {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<StoredReturnData, Revert> {
        require_operator(env)?;
        let indices = store_all(env, op.calls.iter().map(|c| c.payload.as_slice()))?;
        let return_data = return_data(run_calls(env, &op.calls, false)?);
        Ok(StoredReturnData { return_data, indices })
    }
}

impl Method for Aggregate3AndStore {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<StoredOutcomes, Revert> {
        require_operator(env)?;
        let indices = store_all(env, op.calls.iter().map(|c| c.payload.as_slice()))?;
        let results = run_calls3(env, &op.calls)?;
        Ok(StoredOutcomes { results, indices })
    }
}

impl Method for Aggregate3ValueAndStore {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<StoredOutcomes, Revert> {
        require_operator(env)?;
        let indices = store_all(env, op.calls.iter().map(|c| c.payload.as_slice()))?;
        let results = run_calls3_value(env, &op.calls)?;
        Ok(StoredOutcomes { results, indices })
    }
}

// ================================
// Replays
// ================================

impl Method for AggregateFromStorage {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<u8>, Revert> {
        require_operator(env)?;
        require_no_value(env)?;
        let record = call_log::get(env, op.index)?;
        Ok(dispatch_call(env, 0, op.target, 0, &record.payload, false)?.data)
    }
}

impl Method for AggregateFromStorageBatch {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<Vec<u8>>, Revert> {
        require_operator(env)?;
        require_no_value(env)?;
        let mut data = Vec::with_capacity(op.indices.len());
        for (i, index) in op.indices.iter().enumerate() {
            let record = call_log::get(env, *index)?;
            data.push(dispatch_call(env, i, op.target, 0, &record.payload, false)?.data);
        }
        Ok(data)
    }
}

impl Method for Aggregate3FromStorage {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<CallOutcome>, Revert> {
        require_operator(env)?;
        require_no_value(env)?;
        let mut results = Vec::with_capacity(op.calls.len());
        for (i, call) in op.calls.iter().enumerate() {
            // An unresolvable index aborts even when the call tolerates failure
            let record = call_log::get(env, call.index)?;
            results.push(dispatch_call(env, i, call.target, 0, &record.payload, call.allow_failure)?);
        }
        Ok(results)
    }
}

// ================================
// Ownership and Operators
// ================================

impl Method for Owner {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<Address, Revert> {
        state::load_owner(env)
    }
}

impl Method for TransferOwnership {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Address, Revert> {
        require_owner(env)?;
        if op.new_owner.is_zero() {
            return Err(AggregatorError::ZeroAddress.into());
        }
        let previous = state::load_owner(env)?;
        state::store_owner(env, &op.new_owner)?;
        env.emit(&OwnershipTransferred { previous, owner: op.new_owner })?;
        info!("Aggregator {} ownership moved from {} to {}", env.address(), previous, op.new_owner);
        Ok(op.new_owner)
    }
}

impl Method for SetOperators {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<Address>, Revert> {
        require_owner(env)?;
        let mut operators = state::load_operators(env)?;
        for update in &op.updates {
            if update.operator.is_zero() {
                return Err(AggregatorError::ZeroAddress.into());
            }
            if update.allowed {
                operators.insert(update.operator);
            } else {
                operators.remove(&update.operator);
            }
            env.emit(&OperatorSet { operator: update.operator, allowed: update.allowed })?;
        }
        state::store_operators(env, &operators)?;
        info!("Aggregator {} now has {} operators", env.address(), operators.len());
        Ok(operators.into_iter().collect())
    }
}

impl Method for IsOperator {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<bool, Revert> {
        Ok(state::load_operators(env)?.contains(&op.account))
    }
}

impl Method for Operators {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<Vec<Address>, Revert> {
        Ok(state::load_operators(env)?.into_iter().collect())
    }
}

// ================================
// Views
// ================================

impl Method for GetBalance {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<u128, Revert> {
        Ok(env.balance(op.account))
    }
}

impl Method for BlockNumber {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<u64, Revert> {
        Ok(env.block_number())
    }
}

impl Method for ChainId {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<u64, Revert> {
        Ok(env.chain_id())
    }
}

impl Method for Timestamp {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<u64, Revert> {
        Ok(env.timestamp())
    }
}

impl Method for StoredCallCount {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<u64, Revert> {
        call_log::len(env)
    }
}

impl Method for GetStoredCall {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<StoredCall, Revert> {
        call_log::get(env, op.index)
    }
}
