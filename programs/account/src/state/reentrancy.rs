// Reentrancy state machine
//
// A two-state flag kept in transient storage, so the host resets it to Idle
// at the start and end of every top-level invocation. Guarded entry points
// move Idle -> Executing -> Idle; entering while Executing fails. Calls the
// account makes to itself skip the guard: that is how batches compose
// account operations.

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::debug;
use vessel_common::Revert;
use vessel_runtime::Env;

use crate::errors::AccountError;

const EXECUTION_STATE_KEY: &[u8] = b"vessel.account.execution";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ExecutionState {
    #[default]
    Idle,
    Executing,
}

pub fn execution_state(env: &mut Env<'_>) -> Result<ExecutionState, Revert> {
    Ok(env.load_transient::<ExecutionState>(EXECUTION_STATE_KEY)?.unwrap_or_default())
}

/// Run `f` with the account marked as executing
pub fn guarded<T, F>(env: &mut Env<'_>, f: F) -> Result<T, Revert>
where
    F: FnOnce(&mut Env<'_>) -> Result<T, Revert>,
{
    if env.caller() == env.address() {
        return f(env);
    }
    if execution_state(env)? == ExecutionState::Executing {
        debug!("Rejecting reentrant call from {} into {}", env.caller(), env.address());
        return Err(AccountError::ReentrantCall.into());
    }

    env.store_transient(EXECUTION_STATE_KEY.to_vec(), &ExecutionState::Executing)?;
    let result = f(env);
    env.store_transient(EXECUTION_STATE_KEY.to_vec(), &ExecutionState::Idle)?;
    result
}
