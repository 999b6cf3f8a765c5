//! Vessel Account
//!
//! A per-identity account whose callable surface is composed after creation.
//! Incoming calls are routed by selector:
//!
//! 1. empty payload: accepted as a plain value deposit
//! 2. module table hit on the account itself: a built-in operation
//! 3. module table hit on another module: forwarded to that module in the
//!    account's storage context
//! 4. anything else: the override table, then the miss policy
//!
//! Ownership follows the identity record the account is bound to.

use tracing::{debug, info, trace};
use vessel_common::{decode_args, split_selector, CallResult, CodecError, Selector};
use vessel_runtime::{Contract, Env, MethodTable};

pub mod authority;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod interfaces;
pub mod operations;
pub mod state;
pub mod validation;

pub use errors::{AccountError, AccountResult};
pub use operations::*;
pub use state::{
    AccountInit, ExecutionState, IdentityBinding, MissPolicy, ModuleMutation, ModuleOperations, ModuleTable,
    MutationAction, OverrideEntry, OverrideTarget, RoleGrant,
};

/// Account code. Stateless: every account deployed with it keeps its tables
/// in its own storage.
pub struct ModularAccount {
    builtins: MethodTable,
}

impl Default for ModularAccount {
    fn default() -> Self {
        Self::new()
    }
}

impl ModularAccount {
    pub fn new() -> Self {
        let mut builtins = MethodTable::new();
        builtins
            // Module Registry
            .register::<ApplyMutations>()
            .register::<Modules>()
            .register::<ModuleOf>()
            .register::<ModuleAddresses>()
            .register::<OperationsOf>()
            // Override Table
            .register::<SetOverrides>()
            .register::<OverrideOf>()
            .register::<SetMissPolicy>()
            .register::<GetMissPolicy>()
            // Access Control Ledger
            .register::<GrantOrRevoke>()
            .register::<HasRole>()
            // Execution Router
            .register::<Execute>()
            .register::<ExecuteBatch>()
            .register::<ExecuteByRole>()
            .register::<ExecuteBatchByRole>()
            // Identity and discovery
            .register::<Owner>()
            .register::<Token>()
            .register::<State>()
            .register::<IsValidSigner>()
            .register::<SupportsInterface>();
        Self { builtins }
    }

    /// Selectors served by the account itself
    pub fn builtin_operations(&self) -> Vec<Selector> {
        self.builtins.selectors()
    }
}

impl Contract for ModularAccount {
    fn name(&self) -> &str {
        "vessel-account"
    }

    fn construct(&self, env: &mut Env<'_>, args: &[u8]) -> CallResult {
        let init: AccountInit = decode_args(args)?;
        info!(
            "Creating account {} bound to token {} at {} on chain {}",
            env.address(),
            init.binding.token_id,
            init.binding.registry,
            init.binding.chain_id
        );
        state::settings::store_binding(env, &init.binding)?;
        state::overrides::store_miss_policy(env, init.miss_policy)?;

        let mut table = ModuleTable::new(env.address());
        for operation in self.builtins.selectors() {
            table.seed(operation);
        }
        instructions::registry::store_table(env, &table)?;
        Ok(Vec::new())
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult {
        if input.is_empty() {
            trace!("{} received {} from {}", env.address(), env.value(), env.caller());
            return Ok(Vec::new());
        }
        let (operation, args) = split_selector(input).ok_or(CodecError::MissingSelector)?;

        let table = instructions::registry::load_table(env)?;
        match table.route(&operation) {
            Some(module) if module == table.reserved() => {
                if let Some(handler) = self.builtins.get(&operation) {
                    return handler(env, args);
                }
                // Routed to the account without a built-in: fall through
                instructions::overrides::dispatch(env, operation, input)
            }
            Some(module) => {
                debug!("Routing {} on {} to module {}", operation, env.address(), module);
                env.delegate_call(module, input)
            }
            None => instructions::overrides::dispatch(env, operation, input),
        }
    }
}
