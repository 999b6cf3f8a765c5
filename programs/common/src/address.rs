use borsh::{BorshDeserialize, BorshSerialize};

use crate::hashing::sha256;
use crate::hex_serde::impl_hex_serde;

/// Width of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte location in the world: an externally controlled key, an account,
/// a module or any other deployed code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BorshSerialize, BorshDeserialize)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl_hex_serde!(Address, ADDRESS_LEN);

impl Address {
    /// The zero address. Never owns anything and never holds code.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Address whose low eight bytes hold `value`, big-endian
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Deterministic address derived from a seed label
    pub fn derive(seed: &[u8]) -> Self {
        let digest = sha256(&[b"vessel.address", seed]);
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[32 - ADDRESS_LEN..]);
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}
