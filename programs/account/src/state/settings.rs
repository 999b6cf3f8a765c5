// Identity binding, construction arguments and the state counter

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use vessel_common::{Address, Revert};
use vessel_runtime::Env;

use super::overrides::MissPolicy;

const BINDING_KEY: &[u8] = b"vessel.account.binding";
const STATE_KEY: &[u8] = b"vessel.account.state";

/// The identity record an account belongs to. Ownership of that record is
/// ownership of the account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct IdentityBinding {
    pub chain_id: u64,
    pub registry: Address,
    pub token_id: u128,
}

/// Constructor arguments
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct AccountInit {
    pub binding: IdentityBinding,
    pub miss_policy: MissPolicy,
}

pub fn load_binding(env: &mut Env<'_>) -> Result<Option<IdentityBinding>, Revert> {
    env.load::<IdentityBinding>(BINDING_KEY)
}

pub fn store_binding(env: &mut Env<'_>, binding: &IdentityBinding) -> Result<(), Revert> {
    env.store(BINDING_KEY.to_vec(), binding)
}

pub fn state(env: &mut Env<'_>) -> Result<u64, Revert> {
    Ok(env.load::<u64>(STATE_KEY)?.unwrap_or(0))
}

/// Advance the state counter by `steps` and return the new value
pub fn advance_state(env: &mut Env<'_>, steps: u64) -> Result<u64, Revert> {
    let next = state(env)?.wrapping_add(steps);
    env.store(STATE_KEY.to_vec(), &next)?;
    Ok(next)
}
