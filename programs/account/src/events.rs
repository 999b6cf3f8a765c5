// Account notifications
//
// Each event carries the full new state of the entry it describes so an
// observer can rebuild the account's tables from events alone.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use vessel_common::{Address, RoleId, Selector};
use vessel_runtime::Event;

use crate::state::MissPolicy;

/// A selector's route after a mutation; zero module means unrouted
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct OperationRouted {
    pub operation: Selector,
    pub module: Address,
}

impl Event for OperationRouted {
    const NAME: &'static str = "OperationRouted";
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct InitializerCalled {
    pub target: Address,
    pub payload: Vec<u8>,
}

impl Event for InitializerCalled {
    const NAME: &'static str = "InitializerCalled";
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct OverrideSet {
    pub operation: Selector,
    pub implementation: Address,
    pub protected: bool,
}

impl Event for OverrideSet {
    const NAME: &'static str = "OverrideSet";
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct RoleSet {
    pub role: RoleId,
    pub account: Address,
    pub granted: bool,
}

impl Event for RoleSet {
    const NAME: &'static str = "RoleSet";
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct MissPolicySet {
    pub policy: MissPolicy,
}

impl Event for MissPolicySet {
    const NAME: &'static str = "MissPolicySet";
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct Executed {
    pub target: Address,
    pub value: u128,
    pub state: u64,
}

impl Event for Executed {
    const NAME: &'static str = "Executed";
}
