//! Typed operations understood by a modular account
//!
//! Each struct is the argument list of one operation; its selector comes from
//! `SIGNATURE` and its return value is `Output`. Mutating operations return
//! the account's state counter after the change.

use borsh::{BorshDeserialize, BorshSerialize};
use vessel_common::{Address, InterfaceId, Operation, RoleId, Selector};

use crate::state::{
    IdentityBinding, MissPolicy, ModuleMutation, ModuleOperations, OverrideEntry, OverrideTarget, RoleGrant,
};

/// One call of an execute batch
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CallRequest {
    pub target: Address,
    pub value: u128,
    pub payload: Vec<u8>,
}

/// The only supported `Execute::mode`: a plain call carrying value
pub const CALL_MODE: u8 = 0;

macro_rules! operation {
    ($name:ident, $signature:literal, $output:ty) => {
        impl Operation for $name {
            const SIGNATURE: &'static str = $signature;
            type Output = $output;
        }
    };
}

// ===== Module Registry =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ApplyMutations {
    pub mutations: Vec<ModuleMutation>,
    /// Zero to skip initialization
    pub init_target: Address,
    pub init_payload: Vec<u8>,
}
operation!(ApplyMutations, "applyMutations((address,uint8,bytes4[])[],address,bytes)", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Modules {}
operation!(Modules, "modules()", Vec<ModuleOperations>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ModuleOf {
    pub operation: Selector,
}
operation!(ModuleOf, "moduleOf(bytes4)", Address);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ModuleAddresses {}
operation!(ModuleAddresses, "moduleAddresses()", Vec<Address>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct OperationsOf {
    pub module: Address,
}
operation!(OperationsOf, "operationsOf(address)", Vec<Selector>);

// ===== Override Table =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SetOverrides {
    pub entries: Vec<OverrideEntry>,
}
operation!(SetOverrides, "setOverrides((bytes4,address,bool)[])", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct OverrideOf {
    pub operation: Selector,
}
operation!(OverrideOf, "overrideOf(bytes4)", OverrideTarget);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SetMissPolicy {
    pub policy: MissPolicy,
}
operation!(SetMissPolicy, "setMissPolicy(uint8)", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GetMissPolicy {}
operation!(GetMissPolicy, "missPolicy()", MissPolicy);

// ===== Access Control Ledger =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GrantOrRevoke {
    pub entries: Vec<RoleGrant>,
}
operation!(GrantOrRevoke, "grantOrRevoke((bytes32,address,bool)[])", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct HasRole {
    pub role: RoleId,
    pub account: Address,
}
operation!(HasRole, "hasRole(bytes32,address)", bool);

// ===== Execution Router =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Execute {
    pub target: Address,
    pub value: u128,
    pub payload: Vec<u8>,
    pub mode: u8,
}
operation!(Execute, "execute(address,uint256,bytes,uint8)", Vec<u8>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ExecuteBatch {
    pub calls: Vec<CallRequest>,
}
operation!(ExecuteBatch, "executeBatch((address,uint256,bytes)[])", Vec<Vec<u8>>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ExecuteByRole {
    pub target: Address,
    pub value: u128,
    pub payload: Vec<u8>,
    pub mode: u8,
}
operation!(ExecuteByRole, "executeByRole(address,uint256,bytes,uint8)", Vec<u8>);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ExecuteBatchByRole {
    pub calls: Vec<CallRequest>,
}
operation!(ExecuteBatchByRole, "executeBatchByRole((address,uint256,bytes)[])", Vec<Vec<u8>>);

// ===== Identity and discovery =====

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Owner {}
operation!(Owner, "owner()", Address);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Token {}
operation!(Token, "token()", IdentityBinding);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct State {}
operation!(State, "state()", u64);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct IsValidSigner {
    pub signer: Address,
}
operation!(IsValidSigner, "isValidSigner(address)", bool);

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SupportsInterface {
    pub interface_id: InterfaceId,
}
operation!(SupportsInterface, "supportsInterface(bytes4)", bool);

// ===== Identity collaborator =====

/// Served by the identity registry an account is bound to
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct OwnerOf {
    pub token_id: u128,
}
operation!(OwnerOf, "ownerOf(uint256)", Address);
