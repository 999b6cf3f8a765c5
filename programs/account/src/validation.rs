// Bounds on caller-supplied batches
use crate::errors::{AccountError, AccountResult};

/// Maximum entries in any batch the account accepts
pub const MAX_BATCH_LEN: usize = 256;

pub fn validate_batch_len(len: usize) -> AccountResult<()> {
    if len > MAX_BATCH_LEN {
        return Err(AccountError::BatchTooLarge {
            len: u32::try_from(len).unwrap_or(u32::MAX),
            max: MAX_BATCH_LEN as u32,
        });
    }
    Ok(())
}
