// Module Registry table
//
// Maps each operation selector to exactly one module address. The account's
// own address is the reserved module: selectors routed to it anchor the
// account's built-in operations and may be added to but never replaced or
// removed. The table is kept as one value in account storage so a batch is
// either written whole or not at all.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use vessel_common::{Address, Selector};

use crate::errors::{AccountError, AccountResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum MutationAction {
    Add,
    Replace,
    Remove,
}

/// One entry of a mutation batch
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct ModuleMutation {
    /// Module to route to; must be zero for `Remove`
    pub module: Address,
    pub action: MutationAction,
    pub operations: Vec<Selector>,
}

/// A module together with every selector currently routed to it
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct ModuleOperations {
    pub module: Address,
    pub operations: Vec<Selector>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ModuleTable {
    reserved: Address,
    routes: BTreeMap<Selector, Address>,
}

impl ModuleTable {
    pub fn new(reserved: Address) -> Self {
        Self {
            reserved,
            routes: BTreeMap::new(),
        }
    }

    pub fn reserved(&self) -> Address {
        self.reserved
    }

    pub fn route(&self, operation: &Selector) -> Option<Address> {
        self.routes.get(operation).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Every routed module with its selectors, ordered by module address
    pub fn modules(&self) -> Vec<ModuleOperations> {
        let mut grouped: BTreeMap<Address, Vec<Selector>> = BTreeMap::new();
        for (operation, module) in &self.routes {
            grouped.entry(*module).or_default().push(*operation);
        }
        grouped
            .into_iter()
            .map(|(module, operations)| ModuleOperations { module, operations })
            .collect()
    }

    pub fn module_addresses(&self) -> Vec<Address> {
        self.modules().into_iter().map(|m| m.module).collect()
    }

    pub fn operations_of(&self, module: &Address) -> Vec<Selector> {
        self.routes
            .iter()
            .filter(|(_, routed)| *routed == module)
            .map(|(operation, _)| *operation)
            .collect()
    }

    /// Apply a whole batch. Entries are validated in order against the
    /// table as earlier entries leave it; on the first invalid entry the
    /// table is left untouched and the error returned.
    pub fn apply<F>(&mut self, mutations: &[ModuleMutation], is_executable: F) -> AccountResult<Vec<(Selector, Address)>>
    where
        F: Fn(&Address) -> bool,
    {
        let mut staged = self.routes.clone();
        let mut changed = Vec::new();

        for mutation in mutations {
            if mutation.operations.is_empty() {
                return Err(AccountError::EmptyList);
            }
            match mutation.action {
                MutationAction::Add => {
                    self.check_target(&mutation.module, &is_executable)?;
                    for operation in &mutation.operations {
                        if staged.contains_key(operation) {
                            return Err(AccountError::DuplicateOperation(*operation));
                        }
                        staged.insert(*operation, mutation.module);
                        changed.push((*operation, mutation.module));
                    }
                }
                MutationAction::Replace => {
                    self.check_target(&mutation.module, &is_executable)?;
                    for operation in &mutation.operations {
                        let current = self.mutable_route(&staged, operation)?;
                        if current == mutation.module {
                            return Err(AccountError::NoOpReplace(*operation));
                        }
                        staged.insert(*operation, mutation.module);
                        changed.push((*operation, mutation.module));
                    }
                }
                MutationAction::Remove => {
                    if !mutation.module.is_zero() {
                        return Err(AccountError::RemoveTargetNotZero(mutation.module));
                    }
                    for operation in &mutation.operations {
                        self.mutable_route(&staged, operation)?;
                        staged.remove(operation);
                        changed.push((*operation, Address::ZERO));
                    }
                }
            }
        }

        self.routes = staged;
        Ok(changed)
    }

    /// Route seeded at construction; not subject to batch validation
    pub(crate) fn seed(&mut self, operation: Selector) {
        self.routes.insert(operation, self.reserved);
    }

    fn check_target<F>(&self, module: &Address, is_executable: &F) -> AccountResult<()>
    where
        F: Fn(&Address) -> bool,
    {
        if module.is_zero() {
            return Err(AccountError::ZeroAddress);
        }
        if !is_executable(module) {
            return Err(AccountError::NotExecutable(*module));
        }
        Ok(())
    }

    fn mutable_route(&self, staged: &BTreeMap<Selector, Address>, operation: &Selector) -> AccountResult<Address> {
        match staged.get(operation) {
            None => Err(AccountError::UnknownOperation(*operation)),
            Some(module) if *module == self.reserved => Err(AccountError::ImmutableOperation(*operation)),
            Some(module) => Ok(*module),
        }
    }
}
