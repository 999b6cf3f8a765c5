//! Builders for the account's batched configuration operations

use vessel_account::{
    ApplyMutations, GrantOrRevoke, ModuleMutation, MutationAction, OverrideEntry, RoleGrant, SetOverrides,
};
use vessel_common::{Address, Operation, Role, RoleId, Selector};

/// Builder for a Module Registry mutation batch
#[derive(Debug, Clone, Default)]
pub struct MutationBatch {
    mutations: Vec<ModuleMutation>,
    init_target: Address,
    init_payload: Vec<u8>,
}

impl MutationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `operations` to `module`
    pub fn add(mut self, module: Address, operations: impl IntoIterator<Item = Selector>) -> Self {
        self.push(module, MutationAction::Add, operations);
        self
    }

    /// Route every selector of `O` to `module`
    pub fn add_operation<O: Operation>(self, module: Address) -> Self {
        self.add(module, [O::selector()])
    }

    pub fn replace(mut self, module: Address, operations: impl IntoIterator<Item = Selector>) -> Self {
        self.push(module, MutationAction::Replace, operations);
        self
    }

    pub fn remove(mut self, operations: impl IntoIterator<Item = Selector>) -> Self {
        self.push(Address::ZERO, MutationAction::Remove, operations);
        self
    }

    /// Run `payload` at `target` in the account's storage context once the
    /// routes are applied
    pub fn initialize(mut self, target: Address, payload: Vec<u8>) -> Self {
        self.init_target = target;
        self.init_payload = payload;
        self
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn build(self) -> ApplyMutations {
        ApplyMutations {
            mutations: self.mutations,
            init_target: self.init_target,
            init_payload: self.init_payload,
        }
    }

    fn push(&mut self, module: Address, action: MutationAction, operations: impl IntoIterator<Item = Selector>) {
        self.mutations.push(ModuleMutation {
            module,
            action,
            operations: operations.into_iter().collect(),
        });
    }
}

/// Builder for an Override Table batch
#[derive(Debug, Clone, Default)]
pub struct OverrideBatch {
    entries: Vec<OverrideEntry>,
}

impl OverrideBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, operation: Selector, implementation: Address, protected: bool) -> Self {
        self.entries.push(OverrideEntry { operation, implementation, protected });
        self
    }

    pub fn clear(self, operation: Selector) -> Self {
        self.set(operation, Address::ZERO, false)
    }

    pub fn build(self) -> SetOverrides {
        SetOverrides { entries: self.entries }
    }
}

/// Builder for an Access Control Ledger batch
#[derive(Debug, Clone, Default)]
pub struct RoleBatch {
    entries: Vec<RoleGrant>,
}

impl RoleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, role: impl Into<RoleId>, account: Address) -> Self {
        self.entries.push(RoleGrant { role: role.into(), account, grant: true });
        self
    }

    pub fn revoke(mut self, role: impl Into<RoleId>, account: Address) -> Self {
        self.entries.push(RoleGrant { role: role.into(), account, grant: false });
        self
    }

    /// Let `account` call a protected override of `operation`
    pub fn grant_operation(self, operation: Selector, account: Address) -> Self {
        self.grant(Role::Operation(operation), account)
    }

    pub fn build(self) -> GrantOrRevoke {
        GrantOrRevoke { entries: self.entries }
    }
}
