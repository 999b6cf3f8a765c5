use borsh::{BorshDeserialize, BorshSerialize};

use crate::hashing::sha256;
use crate::hex_serde::impl_hex_serde;

/// Width of an operation selector in bytes
pub const SELECTOR_LEN: usize = 4;

/// Operation identifier: the leading four bytes of every call payload
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BorshSerialize, BorshDeserialize)]
pub struct Selector(pub [u8; SELECTOR_LEN]);

impl_hex_serde!(Selector, SELECTOR_LEN);

impl Selector {
    pub const ZERO: Self = Self([0u8; SELECTOR_LEN]);

    pub const fn new(bytes: [u8; SELECTOR_LEN]) -> Self {
        Self(bytes)
    }

    /// First four bytes of sha256 over a human-readable signature such as
    /// `execute(address,uint128,bytes,uint8)`
    pub fn from_signature(signature: &str) -> Self {
        let digest = sha256(&[signature.as_bytes()]);
        Self([digest[0], digest[1], digest[2], digest[3]])
    }

    pub fn as_bytes(&self) -> &[u8; SELECTOR_LEN] {
        &self.0
    }
}

/// Capability identifier, the XOR of every selector in a capability group
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BorshSerialize, BorshDeserialize)]
pub struct InterfaceId(pub [u8; SELECTOR_LEN]);

impl_hex_serde!(InterfaceId, SELECTOR_LEN);

impl InterfaceId {
    /// Reserved id that no capability may claim
    pub const INVALID: Self = Self([0xff; SELECTOR_LEN]);

    pub fn from_selectors<I>(selectors: I) -> Self
    where
        I: IntoIterator<Item = Selector>,
    {
        let mut acc = [0u8; SELECTOR_LEN];
        for selector in selectors {
            for (slot, byte) in acc.iter_mut().zip(selector.0) {
                *slot ^= byte;
            }
        }
        Self(acc)
    }
}
