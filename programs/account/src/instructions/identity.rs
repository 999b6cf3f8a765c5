// Identity-bound views and capability discovery

use vessel_common::{Address, Revert, Role};
use vessel_runtime::{Env, Method};

use crate::authority;
use crate::interfaces;
use crate::operations::{IsValidSigner, Owner, State, SupportsInterface, Token};
use crate::state::{settings, IdentityBinding};

impl Method for Owner {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<Address, Revert> {
        authority::resolve_owner(env)
    }
}

impl Method for Token {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<IdentityBinding, Revert> {
        Ok(settings::load_binding(env)?.unwrap_or_default())
    }
}

impl Method for State {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<u64, Revert> {
        settings::state(env)
    }
}

impl Method for IsValidSigner {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<bool, Revert> {
        authority::has_role(env, &Role::Executor.id(), &op.signer)
    }
}

impl Method for SupportsInterface {
    fn handle(_env: &mut Env<'_>, op: Self) -> Result<bool, Revert> {
        Ok(interfaces::supports(&op.interface_id))
    }
}
