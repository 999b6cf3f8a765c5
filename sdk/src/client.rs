//! Typed handles for accounts and aggregators living in a [`World`]

use std::sync::Arc;

use tracing::debug;
use vessel_account::*;
use vessel_aggregator::{
    Aggregator, AggregatorInit, CallOutcome, GetStoredCall, IsOperator, OperatorUpdate, SetOperators, StoredCall,
    StoredCallCount, TransferOwnership,
};
use vessel_common::{Address, InterfaceId, Operation, RoleId, Selector};
use vessel_runtime::{EventFilter, FilteredEventStream, World};

use crate::batches::{MutationBatch, OverrideBatch, RoleBatch};
use crate::multicall::Multicall;
use crate::Result;

/// Deploy a modular account at `address`
pub fn deploy_account(world: &mut World, deployer: Address, address: Address, init: AccountInit) -> Result<Address> {
    let args = vessel_common::to_vec(&init);
    Ok(world.deploy(deployer, address, Arc::new(ModularAccount::new()), &args)?)
}

pub fn deploy_aggregator(world: &mut World, deployer: Address, address: Address, init: AggregatorInit) -> Result<Address> {
    let args = vessel_common::to_vec(&init);
    Ok(world.deploy(deployer, address, Arc::new(Aggregator::new()), &args)?)
}

/// Committed logs emitted by `emitter`
pub fn watch(world: &World, emitter: Address) -> FilteredEventStream {
    let filter = EventFilter {
        include_reverts: false,
        emitters: Some(vec![emitter]),
        names: None,
    };
    FilteredEventStream::new(world.subscribe(), filter)
}

// ================================
// Account Client
// ================================

/// Sends account operations as `caller`, one top-level invocation each
pub struct AccountClient<'w> {
    world: &'w mut World,
    account: Address,
    caller: Address,
}

impl<'w> AccountClient<'w> {
    pub fn new(world: &'w mut World, account: Address, caller: Address) -> Self {
        Self { world, account, caller }
    }

    pub fn address(&self) -> Address {
        self.account
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Switch the sending address
    pub fn as_caller(&mut self, caller: Address) -> &mut Self {
        self.caller = caller;
        self
    }

    pub fn send<O: Operation>(&mut self, op: &O) -> Result<O::Output> {
        self.send_value(op, 0)
    }

    pub fn send_value<O: Operation>(&mut self, op: &O, value: u128) -> Result<O::Output> {
        debug!("{} -> {} {}", self.caller, self.account, O::SIGNATURE);
        Ok(self.world.call(self.caller, self.account, value, op)?)
    }

    // ===== Module Registry =====

    pub fn apply(&mut self, batch: MutationBatch) -> Result<u64> {
        self.send(&batch.build())
    }

    pub fn modules(&mut self) -> Result<Vec<ModuleOperations>> {
        self.send(&Modules {})
    }

    pub fn module_of(&mut self, operation: Selector) -> Result<Address> {
        self.send(&ModuleOf { operation })
    }

    pub fn module_addresses(&mut self) -> Result<Vec<Address>> {
        self.send(&ModuleAddresses {})
    }

    pub fn operations_of(&mut self, module: Address) -> Result<Vec<Selector>> {
        self.send(&OperationsOf { module })
    }

    // ===== Override Table =====

    pub fn set_overrides(&mut self, batch: OverrideBatch) -> Result<u64> {
        self.send(&batch.build())
    }

    pub fn override_of(&mut self, operation: Selector) -> Result<OverrideTarget> {
        self.send(&OverrideOf { operation })
    }

    pub fn set_miss_policy(&mut self, policy: MissPolicy) -> Result<u64> {
        self.send(&SetMissPolicy { policy })
    }

    pub fn miss_policy(&mut self) -> Result<MissPolicy> {
        self.send(&GetMissPolicy {})
    }

    // ===== Access Control Ledger =====

    pub fn grant_or_revoke(&mut self, batch: RoleBatch) -> Result<u64> {
        self.send(&batch.build())
    }

    pub fn has_role(&mut self, role: impl Into<RoleId>, account: Address) -> Result<bool> {
        self.send(&HasRole { role: role.into(), account })
    }

    // ===== Execution Router =====

    pub fn execute(&mut self, target: Address, value: u128, payload: Vec<u8>) -> Result<Vec<u8>> {
        self.send(&Execute { target, value, payload, mode: CALL_MODE })
    }

    pub fn execute_batch(&mut self, calls: Vec<CallRequest>) -> Result<Vec<Vec<u8>>> {
        self.send(&ExecuteBatch { calls })
    }

    pub fn execute_by_role(&mut self, target: Address, value: u128, payload: Vec<u8>) -> Result<Vec<u8>> {
        self.send(&ExecuteByRole { target, value, payload, mode: CALL_MODE })
    }

    pub fn execute_batch_by_role(&mut self, calls: Vec<CallRequest>) -> Result<Vec<Vec<u8>>> {
        self.send(&ExecuteBatchByRole { calls })
    }

    // ===== Identity and discovery =====

    pub fn owner(&mut self) -> Result<Address> {
        self.send(&Owner {})
    }

    pub fn token(&mut self) -> Result<IdentityBinding> {
        self.send(&Token {})
    }

    pub fn state(&mut self) -> Result<u64> {
        self.send(&State {})
    }

    pub fn is_valid_signer(&mut self, signer: Address) -> Result<bool> {
        self.send(&IsValidSigner { signer })
    }

    pub fn supports_interface(&mut self, interface_id: InterfaceId) -> Result<bool> {
        self.send(&SupportsInterface { interface_id })
    }
}

// ================================
// Aggregator Client
// ================================

pub struct AggregatorClient<'w> {
    world: &'w mut World,
    aggregator: Address,
    caller: Address,
}

impl<'w> AggregatorClient<'w> {
    pub fn new(world: &'w mut World, aggregator: Address, caller: Address) -> Self {
        Self { world, aggregator, caller }
    }

    pub fn address(&self) -> Address {
        self.aggregator
    }

    pub fn as_caller(&mut self, caller: Address) -> &mut Self {
        self.caller = caller;
        self
    }

    pub fn send<O: Operation>(&mut self, op: &O) -> Result<O::Output> {
        self.send_value(op, 0)
    }

    pub fn send_value<O: Operation>(&mut self, op: &O, value: u128) -> Result<O::Output> {
        debug!("{} -> aggregator {} {}", self.caller, self.aggregator, O::SIGNATURE);
        Ok(self.world.call(self.caller, self.aggregator, value, op)?)
    }

    pub fn aggregate(&mut self, calls: &Multicall) -> Result<Vec<Vec<u8>>> {
        self.send(&calls.aggregate())
    }

    pub fn aggregate3(&mut self, calls: &Multicall) -> Result<Vec<CallOutcome>> {
        self.send(&calls.aggregate3())
    }

    /// Sends exactly the summed call values
    pub fn aggregate3_value(&mut self, calls: &Multicall) -> Result<Vec<CallOutcome>> {
        self.send_value(&calls.aggregate3_value(), calls.total_value())
    }

    pub fn set_operators(&mut self, updates: Vec<OperatorUpdate>) -> Result<Vec<Address>> {
        self.send(&SetOperators { updates })
    }

    pub fn is_operator(&mut self, account: Address) -> Result<bool> {
        self.send(&IsOperator { account })
    }

    pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<Address> {
        self.send(&TransferOwnership { new_owner })
    }

    pub fn stored_call_count(&mut self) -> Result<u64> {
        self.send(&StoredCallCount {})
    }

    pub fn stored_call(&mut self, index: u64) -> Result<StoredCall> {
        self.send(&GetStoredCall { index })
    }
}
