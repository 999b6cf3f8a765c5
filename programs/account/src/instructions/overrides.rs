// Override Table: configuration and fallback dispatch

use tracing::{debug, trace};
use vessel_common::{CallResult, Revert, Role, Selector};
use vessel_runtime::{Env, Method};

use crate::authority;
use crate::errors::AccountError;
use crate::events::{MissPolicySet, OverrideSet};
use crate::operations::{GetMissPolicy, OverrideOf, SetMissPolicy, SetOverrides};
use crate::state::overrides::{load_miss_policy, load_override, store_miss_policy, store_override};
use crate::state::reentrancy::guarded;
use crate::state::{settings, MissPolicy, OverrideTarget};
use crate::validation::validate_batch_len;

impl Method for SetOverrides {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<u64, Revert> {
        guarded(env, |env| {
            authority::require_owner(env)?;
            validate_batch_len(op.entries.len())?;
            for entry in &op.entries {
                store_override(env, entry)?;
                env.emit(&OverrideSet {
                    operation: entry.operation,
                    implementation: entry.implementation,
                    protected: entry.protected,
                })?;
            }
            settings::advance_state(env, 1)
        })
    }
}

impl Method for OverrideOf {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<OverrideTarget, Revert> {
        load_override(env, &op.operation)
    }
}

impl Method for SetMissPolicy {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<u64, Revert> {
        guarded(env, |env| {
            authority::require_owner(env)?;
            store_miss_policy(env, op.policy)?;
            env.emit(&MissPolicySet { policy: op.policy })?;
            settings::advance_state(env, 1)
        })
    }
}

impl Method for GetMissPolicy {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<MissPolicy, Revert> {
        load_miss_policy(env)
    }
}

/// Route a selector the module table does not serve. The implementation runs
/// in the account's storage context and its result passes through verbatim.
pub fn dispatch(env: &mut Env<'_>, operation: Selector, input: &[u8]) -> CallResult {
    let target = load_override(env, &operation)?;
    if !target.is_set() {
        return match load_miss_policy(env)? {
            MissPolicy::Revert => Err(AccountError::UnknownOperation(operation).into()),
            MissPolicy::Ignore => {
                trace!("Ignoring unrouted operation {} on {}", operation, env.address());
                Ok(Vec::new())
            }
        };
    }
    if target.protected {
        authority::require_role(env, &Role::Operation(operation).id())?;
    }
    debug!("Forwarding {} on {} to override {}", operation, env.address(), target.implementation);
    env.delegate_call(target.implementation, input)
}
