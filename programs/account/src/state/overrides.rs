// Override Table entries and the miss policy

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use vessel_common::{Address, Revert, Selector};
use vessel_runtime::{slot, Env};

const OVERRIDE_NAMESPACE: &str = "vessel.account.override";
const MISS_POLICY_KEY: &[u8] = b"vessel.account.miss_policy";

/// Where an override points. A zero implementation means "no override".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct OverrideTarget {
    pub implementation: Address,
    pub protected: bool,
}

impl OverrideTarget {
    pub fn is_set(&self) -> bool {
        !self.implementation.is_zero()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub operation: Selector,
    pub implementation: Address,
    pub protected: bool,
}

impl OverrideEntry {
    pub fn target(&self) -> OverrideTarget {
        OverrideTarget {
            implementation: self.implementation,
            protected: self.protected,
        }
    }
}

/// What dispatch does when neither the module table nor the override table
/// routes a selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum MissPolicy {
    /// Fail with `UnknownOperation`
    #[default]
    Revert,
    /// Succeed with empty return data
    Ignore,
}

pub fn load_override(env: &mut Env<'_>, operation: &Selector) -> Result<OverrideTarget, Revert> {
    Ok(env
        .load::<OverrideTarget>(&slot(OVERRIDE_NAMESPACE, operation.as_bytes()))?
        .unwrap_or_default())
}

pub fn store_override(env: &mut Env<'_>, entry: &OverrideEntry) -> Result<(), Revert> {
    env.store(slot(OVERRIDE_NAMESPACE, entry.operation.as_bytes()), &entry.target())
}

pub fn load_miss_policy(env: &mut Env<'_>) -> Result<MissPolicy, Revert> {
    Ok(env.load::<MissPolicy>(MISS_POLICY_KEY)?.unwrap_or_default())
}

pub fn store_miss_policy(env: &mut Env<'_>, policy: MissPolicy) -> Result<(), Revert> {
    env.store(MISS_POLICY_KEY.to_vec(), &policy)
}
