//! Aggregator notifications

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use vessel_common::Address;
use vessel_runtime::Event;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct CallStored {
    pub index: u64,
    pub submitter: Address,
    pub payload: Vec<u8>,
}

impl Event for CallStored {
    const NAME: &'static str = "CallStored";
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct OwnershipTransferred {
    pub previous: Address,
    pub owner: Address,
}

impl Event for OwnershipTransferred {
    const NAME: &'static str = "OwnershipTransferred";
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct OperatorSet {
    pub operator: Address,
    pub allowed: bool,
}

impl Event for OperatorSet {
    const NAME: &'static str = "OperatorSet";
}
