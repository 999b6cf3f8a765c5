// Access Control Ledger storage

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use vessel_common::{Address, Revert, RoleId};
use vessel_runtime::{slot, Env};

const ROLE_NAMESPACE: &str = "vessel.account.role";

/// Grant (`grant = true`) or revoke `role` for `account`
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: RoleId,
    pub account: Address,
    pub grant: bool,
}

fn grant_key(role: &RoleId, account: &Address) -> Vec<u8> {
    let mut suffix = role.0.to_vec();
    suffix.extend_from_slice(account.as_bytes());
    slot(ROLE_NAMESPACE, &suffix)
}

/// Explicit grant only; owner handling lives in the authorization layer
pub fn is_granted(env: &mut Env<'_>, role: &RoleId, account: &Address) -> Result<bool, Revert> {
    Ok(env.load::<bool>(&grant_key(role, account))?.unwrap_or(false))
}

pub fn set_grant(env: &mut Env<'_>, grant: &RoleGrant) -> Result<(), Revert> {
    let key = grant_key(&grant.role, &grant.account);
    if grant.grant {
        env.store(key, &true)
    } else {
        env.clear(&key)
    }
}
