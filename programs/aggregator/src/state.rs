//! Aggregator state: owner, operator allow-list and call records

use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use vessel_common::{Address, Revert};
use vessel_runtime::Env;

const OWNER_KEY: &[u8] = b"vessel.aggregator.owner";
const OPERATORS_KEY: &[u8] = b"vessel.aggregator.operators";

/// Constructor arguments
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct AggregatorInit {
    pub owner: Address,
    pub operators: Vec<Address>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct OperatorUpdate {
    pub operator: Address,
    pub allowed: bool,
}

/// A submitted payload kept for replay
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct StoredCall {
    pub submitter: Address,
    pub block_number: u64,
    pub payload: Vec<u8>,
}

pub fn load_owner(env: &mut Env<'_>) -> Result<Address, Revert> {
    Ok(env.load::<Address>(OWNER_KEY)?.unwrap_or(Address::ZERO))
}

pub fn store_owner(env: &mut Env<'_>, owner: &Address) -> Result<(), Revert> {
    env.store(OWNER_KEY.to_vec(), owner)
}

pub fn load_operators(env: &mut Env<'_>) -> Result<BTreeSet<Address>, Revert> {
    Ok(env.load::<BTreeSet<Address>>(OPERATORS_KEY)?.unwrap_or_default())
}

pub fn store_operators(env: &mut Env<'_>, operators: &BTreeSet<Address>) -> Result<(), Revert> {
    env.store(OPERATORS_KEY.to_vec(), operators)
}
