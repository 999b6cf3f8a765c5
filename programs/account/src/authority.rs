// Owner resolution and the two-tier authorization model
//
// The owner is never stored: it is read from the identity registry the
// account is bound to, and only when the binding names the current chain.
// Anything else (no binding, foreign chain, failing registry) resolves to the
// zero address and every owner check fails closed.

use tracing::{debug, trace};
use vessel_common::{Address, Revert, RoleId};
use vessel_runtime::Env;

use crate::errors::AccountError;
use crate::operations::OwnerOf;
use crate::state::{roles, settings};

pub fn resolve_owner(env: &mut Env<'_>) -> Result<Address, Revert> {
    let Some(binding) = settings::load_binding(env)? else {
        return Ok(Address::ZERO);
    };
    if binding.chain_id != env.chain_id() {
        trace!("Binding names chain {}, running on {}", binding.chain_id, env.chain_id());
        return Ok(Address::ZERO);
    }
    match env.call_op(binding.registry, 0, &OwnerOf { token_id: binding.token_id }) {
        Ok(owner) => Ok(owner),
        Err(revert) => {
            debug!("Owner lookup at {} failed: {}", binding.registry, revert);
            Ok(Address::ZERO)
        }
    }
}

pub fn is_owner(env: &mut Env<'_>, who: &Address) -> Result<bool, Revert> {
    let owner = resolve_owner(env)?;
    Ok(!owner.is_zero() && owner == *who)
}

/// Explicit grant, or ownership of the account
pub fn has_role(env: &mut Env<'_>, role: &RoleId, who: &Address) -> Result<bool, Revert> {
    if roles::is_granted(env, role, who)? {
        return Ok(true);
    }
    is_owner(env, who)
}

/// Caller must be the owner or the account itself
pub fn require_owner(env: &mut Env<'_>) -> Result<(), Revert> {
    let caller = env.caller();
    if caller == env.address() || is_owner(env, &caller)? {
        return Ok(());
    }
    debug!("{} is not the owner of {}", caller, env.address());
    Err(AccountError::Unauthorized.into())
}

/// Caller must hold `role`, own the account, or be the account itself
pub fn require_role(env: &mut Env<'_>, role: &RoleId) -> Result<(), Revert> {
    let caller = env.caller();
    if caller == env.address() || has_role(env, role, &caller)? {
        return Ok(());
    }
    debug!("{} lacks role {} on {}", caller, role, env.address());
    Err(AccountError::Unauthorized.into())
}
