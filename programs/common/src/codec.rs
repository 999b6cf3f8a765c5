//! Call payload codec
//!
//! `payload = selector (4 bytes) || borsh(arguments)`, return data is
//! `borsh(output)`. Both halves are bit-stable: the selector comes from the
//! operation's signature and borsh has a single canonical encoding.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::revert::{CodecError, Revert};
use crate::selector::Selector;

pub use crate::selector::SELECTOR_LEN;

/// A typed operation: its arguments are the implementing struct, its return
/// value is `Output`.
pub trait Operation: BorshSerialize + BorshDeserialize {
    /// Human-readable signature the selector is derived from
    const SIGNATURE: &'static str;

    type Output: BorshSerialize + BorshDeserialize;

    fn selector() -> Selector {
        Selector::from_signature(Self::SIGNATURE)
    }

    fn encode(&self) -> Vec<u8> {
        encode_call(Self::selector(), self)
    }
}

/// Borsh-encode into a fresh buffer
pub fn to_vec<T: BorshSerialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    // Writing into a Vec<u8> cannot fail.
    let _ = value.serialize(&mut buf);
    buf
}

pub fn encode_call<T: BorshSerialize + ?Sized>(selector: Selector, args: &T) -> Vec<u8> {
    let mut payload = selector.0.to_vec();
    payload.extend(to_vec(args));
    payload
}

/// Split a payload into its selector and argument bytes. `None` when the
/// payload is shorter than a selector.
pub fn split_selector(payload: &[u8]) -> Option<(Selector, &[u8])> {
    if payload.len() < SELECTOR_LEN {
        return None;
    }
    let (head, rest) = payload.split_at(SELECTOR_LEN);
    let mut selector = [0u8; SELECTOR_LEN];
    selector.copy_from_slice(head);
    Some((Selector(selector), rest))
}

pub fn decode_args<T: BorshDeserialize>(args: &[u8]) -> Result<T, Revert> {
    T::try_from_slice(args).map_err(|_| CodecError::MalformedArguments.into())
}

pub fn decode_output<T: BorshDeserialize>(data: &[u8]) -> Result<T, Revert> {
    T::try_from_slice(data).map_err(|_| CodecError::MalformedReturnData.into())
}

/// Decode the arguments of `O`, run `handler`, encode its output
pub fn serve<O, F>(args: &[u8], handler: F) -> Result<Vec<u8>, Revert>
where
    O: Operation,
    F: FnOnce(O) -> Result<O::Output, Revert>,
{
    let op = decode_args::<O>(args)?;
    let output = handler(op)?;
    Ok(to_vec(&output))
}
