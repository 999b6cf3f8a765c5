// Access Control Ledger operations

use tracing::info;
use vessel_common::Revert;
use vessel_runtime::{Env, Method};

use crate::authority;
use crate::events::RoleSet;
use crate::operations::{GrantOrRevoke, HasRole};
use crate::state::reentrancy::guarded;
use crate::state::{roles, settings};
use crate::validation::validate_batch_len;

impl Method for GrantOrRevoke {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<u64, Revert> {
        guarded(env, |env| {
            authority::require_owner(env)?;
            validate_batch_len(op.entries.len())?;
            for grant in &op.entries {
                roles::set_grant(env, grant)?;
                env.emit(&RoleSet {
                    role: grant.role,
                    account: grant.account,
                    granted: grant.grant,
                })?;
            }
            info!("Updated {} role grants on {}", op.entries.len(), env.address());
            settings::advance_state(env, 1)
        })
    }
}

impl Method for HasRole {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<bool, Revert> {
        authority::has_role(env, &op.role, &op.account)
    }
}
