// Error system for account operation processing
//
// Accounts process untrusted payloads from arbitrary callers and forward them
// to owner-installed code. Errors are grouped by the failure domain they
// belong to so a caller can tell a bad batch apart from a denied caller or a
// failing callee. Every variant travels across call frames as revert data
// tagged with the "AccountError" domain.

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;
use vessel_common::{Address, Revert, RevertError, Selector};

// ================================
// Account Errors
// ================================

#[derive(Error, Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum AccountError {
    // ===== Configuration =====
    #[error("Zero address not allowed")]
    ZeroAddress,

    #[error("Operation list is empty")]
    EmptyList,

    #[error("No executable code at {0}")]
    NotExecutable(Address),

    #[error("Remove mutation must target the zero address, got {0}")]
    RemoveTargetNotZero(Address),

    #[error("Batch of {len} entries exceeds the limit of {max}")]
    BatchTooLarge { len: u32, max: u32 },

    // ===== State Conflicts =====
    #[error("Operation {0} is already routed")]
    DuplicateOperation(Selector),

    #[error("Operation {0} is not routed")]
    UnknownOperation(Selector),

    #[error("Operation {0} belongs to the account itself and cannot change")]
    ImmutableOperation(Selector),

    #[error("Operation {0} is already routed to that module")]
    NoOpReplace(Selector),

    // ===== Authorization =====
    #[error("Unauthorized")]
    Unauthorized,

    // ===== Execution =====
    #[error("Call failed without a reason")]
    CallFailed,

    #[error("Unsupported call mode {0}")]
    UnsupportedCallMode(u8),

    #[error("Reentrant call")]
    ReentrantCall,

    #[error("Initializer at {0} failed without a reason")]
    InitializationFailed(Address),
}

impl RevertError for AccountError {
    const DOMAIN: &'static str = "AccountError";
}

impl From<AccountError> for Revert {
    fn from(err: AccountError) -> Self {
        Revert::error(&err)
    }
}

pub type AccountResult<T> = Result<T, AccountError>;
