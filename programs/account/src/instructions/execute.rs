// Execution Router
//
// Plain value-carrying calls only: the router never runs a caller-chosen
// target in the account's storage context. Batches run in order and the
// first failure discards the whole batch.

use tracing::debug;
use vessel_common::{Address, Revert, Role};
use vessel_runtime::{Env, Method};

use crate::authority;
use crate::errors::AccountError;
use crate::events::Executed;
use crate::operations::{CallRequest, Execute, ExecuteBatch, ExecuteBatchByRole, ExecuteByRole, CALL_MODE};
use crate::state::reentrancy::guarded;
use crate::state::settings;
use crate::validation::validate_batch_len;

#[derive(Clone, Copy)]
enum Gate {
    Owner,
    Executor,
}

fn authorize(env: &mut Env<'_>, gate: Gate) -> Result<(), Revert> {
    match gate {
        Gate::Owner => authority::require_owner(env),
        Gate::Executor => authority::require_role(env, &Role::Executor.id()),
    }
}

/// Executors may not call back into the account: a self-call passes every
/// owner check in the nested frame
fn check_target(env: &Env<'_>, gate: Gate, target: Address) -> Result<(), Revert> {
    if matches!(gate, Gate::Executor) && target == env.address() {
        debug!("Rejecting executor call into {}", target);
        return Err(AccountError::Unauthorized.into());
    }
    Ok(())
}

/// Run one call from the account and advance the state counter
fn call(env: &mut Env<'_>, target: Address, value: u128, payload: &[u8]) -> Result<Vec<u8>, Revert> {
    debug!("{} executing call to {} with value {}", env.address(), target, value);
    let data = env
        .call(target, value, payload)
        .map_err(|revert| revert.or_else(AccountError::CallFailed))?;
    let state = settings::advance_state(env, 1)?;
    env.emit(&Executed { target, value, state })?;
    Ok(data)
}

fn execute_single(env: &mut Env<'_>, gate: Gate, target: Address, value: u128, payload: &[u8], mode: u8) -> Result<Vec<u8>, Revert> {
    guarded(env, |env| {
        authorize(env, gate)?;
        if mode != CALL_MODE {
            return Err(AccountError::UnsupportedCallMode(mode).into());
        }
        check_target(env, gate, target)?;
        call(env, target, value, payload)
    })
}

fn execute_batch(env: &mut Env<'_>, gate: Gate, calls: &[CallRequest]) -> Result<Vec<Vec<u8>>, Revert> {
    guarded(env, |env| {
        authorize(env, gate)?;
        validate_batch_len(calls.len())?;
        for request in calls {
            check_target(env, gate, request.target)?;
        }
        calls
            .iter()
            .map(|request| call(env, request.target, request.value, &request.payload))
            .collect()
    })
}

impl Method for Execute {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<u8>, Revert> {
        execute_single(env, Gate::Owner, op.target, op.value, &op.payload, op.mode)
    }
}

impl Method for ExecuteBatch {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<Vec<u8>>, Revert> {
        execute_batch(env, Gate::Owner, &op.calls)
    }
}

impl Method for ExecuteByRole {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<u8>, Revert> {
        execute_single(env, Gate::Executor, op.target, op.value, &op.payload, op.mode)
    }
}

impl Method for ExecuteBatchByRole {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<Vec<u8>>, Revert> {
        execute_batch(env, Gate::Executor, &op.calls)
    }
}
