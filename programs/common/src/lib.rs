//! Shared building blocks for the Vessel account runtime
//!
//! Every component speaks the same two-part call encoding: a fixed-width
//! operation selector followed by borsh-encoded arguments. This crate owns the
//! fixed-width identifiers, that codec, and the revert payload format so the
//! host, the account core and the aggregator agree bit-for-bit.

pub mod address;
pub mod codec;
pub mod revert;
pub mod role;
pub mod selector;

mod hex_serde;

pub use address::Address;
pub use codec::{
    decode_args, decode_output, encode_call, serve, split_selector, to_vec, Operation,
    SELECTOR_LEN,
};
pub use revert::{CodecError, Revert, RevertError};
pub use role::{Role, RoleId};
pub use selector::{InterfaceId, Selector};

/// Result of any call into contract code
pub type CallResult = std::result::Result<Vec<u8>, Revert>;

/// Hash helpers shared by selector, role and address derivation
pub mod hashing {
    use sha2::{Digest, Sha256};

    /// SHA-256 over the concatenation of `parts`
    pub fn sha256(parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}
