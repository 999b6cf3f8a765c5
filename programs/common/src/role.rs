use borsh::{BorshDeserialize, BorshSerialize};

use crate::hashing::sha256;
use crate::hex_serde::impl_hex_serde;
use crate::selector::Selector;

/// Opaque 32-byte role identifier as stored in an access control ledger
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BorshSerialize, BorshDeserialize)]
pub struct RoleId(pub [u8; 32]);

impl_hex_serde!(RoleId, 32);

impl RoleId {
    /// Role id derived once from a human-readable name
    pub fn named(name: &str) -> Self {
        Self(sha256(&[b"vessel.role:", name.as_bytes()]))
    }
}

/// Roles the account core knows about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// May drive the role-gated execution router entry points
    Executor,
    /// May invoke one specific protected override
    Operation(Selector),
    /// Caller-defined role
    Custom(RoleId),
}

impl Role {
    pub fn id(&self) -> RoleId {
        match self {
            Self::Executor => RoleId::named("EXECUTOR"),
            Self::Operation(selector) => {
                RoleId(sha256(&[b"vessel.role.operation:", selector.as_bytes()]))
            }
            Self::Custom(id) => *id,
        }
    }
}

impl From<Role> for RoleId {
    fn from(role: Role) -> Self {
        role.id()
    }
}
