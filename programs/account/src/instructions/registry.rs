// Module Registry: batched mutation and introspection

use tracing::{debug, info};
use vessel_common::{Address, Revert, Selector};
use vessel_runtime::{Env, Method};

use crate::authority;
use crate::errors::AccountError;
use crate::events::{InitializerCalled, OperationRouted};
use crate::operations::{ApplyMutations, ModuleAddresses, ModuleOf, Modules, OperationsOf};
use crate::state::reentrancy::guarded;
use crate::state::{settings, ModuleOperations, ModuleTable};
use crate::validation::validate_batch_len;

const TABLE_KEY: &[u8] = b"vessel.account.modules";

pub fn load_table(env: &mut Env<'_>) -> Result<ModuleTable, Revert> {
    let address = env.address();
    Ok(env
        .load::<ModuleTable>(TABLE_KEY)?
        .unwrap_or_else(|| ModuleTable::new(address)))
}

pub fn store_table(env: &mut Env<'_>, table: &ModuleTable) -> Result<(), Revert> {
    env.store(TABLE_KEY.to_vec(), table)
}

impl Method for ApplyMutations {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<u64, Revert> {
        guarded(env, |env| {
            authority::require_owner(env)?;
            validate_batch_len(op.mutations.len())?;

            let mut table = load_table(env)?;
            let changed = table.apply(&op.mutations, |module| env.has_code(*module))?;
            store_table(env, &table)?;
            for (operation, module) in &changed {
                env.emit(&OperationRouted { operation: *operation, module: *module })?;
            }
            info!("Applied {} module mutations to {} ({} routes changed)", op.mutations.len(), env.address(), changed.len());

            if !op.init_target.is_zero() {
                initialize(env, op.init_target, &op.init_payload)?;
            }
            settings::advance_state(env, 1)
        })
    }
}

fn initialize(env: &mut Env<'_>, target: Address, payload: &[u8]) -> Result<(), Revert> {
    if !env.has_code(target) {
        return Err(AccountError::NotExecutable(target).into());
    }
    debug!("Running initializer {} for {}", target, env.address());
    env.delegate_call(target, payload)
        .map_err(|revert| revert.or_else(AccountError::InitializationFailed(target)))?;
    env.emit(&InitializerCalled { target, payload: payload.to_vec() })
}

impl Method for Modules {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<Vec<ModuleOperations>, Revert> {
        Ok(load_table(env)?.modules())
    }
}

impl Method for ModuleOf {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Address, Revert> {
        Ok(load_table(env)?.route(&op.operation).unwrap_or(Address::ZERO))
    }
}

impl Method for ModuleAddresses {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<Vec<Address>, Revert> {
        Ok(load_table(env)?.module_addresses())
    }
}

impl Method for OperationsOf {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Vec<Selector>, Revert> {
        Ok(load_table(env)?.operations_of(&op.module))
    }
}
