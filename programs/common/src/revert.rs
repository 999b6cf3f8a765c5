//! Revert payloads
//!
//! A revert carries raw bytes. Typed errors encode as `tag || borsh(error)`
//! where the tag is the selector of the error's domain name, so any layer can
//! bubble bytes verbatim and any observer can decode them later. An empty
//! payload means "failed without a reason".

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{split_selector, to_vec};
use crate::selector::Selector;

/// Domain used for free-text reasons
pub const REASON_DOMAIN: &str = "Error(string)";

/// Error enums that travel inside revert payloads
pub trait RevertError: BorshSerialize + BorshDeserialize {
    const DOMAIN: &'static str;

    fn tag() -> Selector {
        Selector::from_signature(Self::DOMAIN)
    }
}

/// Failure data returned by a call
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Revert {
    data: Vec<u8>,
}

impl Revert {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Failure without a reason
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn reason(reason: impl Into<String>) -> Self {
        Self::tagged(Selector::from_signature(REASON_DOMAIN), &reason.into())
    }

    pub fn error<E: RevertError>(error: &E) -> Self {
        Self::tagged(E::tag(), error)
    }

    fn tagged<T: BorshSerialize + ?Sized>(tag: Selector, body: &T) -> Self {
        let mut data = tag.0.to_vec();
        data.extend(to_vec(body));
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Decode as `E` when the payload carries `E`'s domain tag
    pub fn decode<E: RevertError>(&self) -> Option<E> {
        let (tag, body) = split_selector(&self.data)?;
        if tag != E::tag() {
            return None;
        }
        E::try_from_slice(body).ok()
    }

    pub fn as_reason(&self) -> Option<String> {
        let (tag, body) = split_selector(&self.data)?;
        if tag != Selector::from_signature(REASON_DOMAIN) {
            return None;
        }
        String::try_from_slice(body).ok()
    }

    /// Substitute `fallback` when the payload is empty
    pub fn or_else<E: RevertError>(self, fallback: E) -> Self {
        if self.is_empty() {
            Self::error(&fallback)
        } else {
            self
        }
    }
}

impl std::fmt::Debug for Revert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_reason() {
            Some(reason) => write!(f, "Revert({reason:?})"),
            None => write!(f, "Revert(0x{})", hex::encode(&self.data)),
        }
    }
}

impl std::fmt::Display for Revert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.data.is_empty() {
            return write!(f, "reverted without a reason");
        }
        match self.as_reason() {
            Some(reason) => write!(f, "reverted: {reason}"),
            None => write!(f, "reverted with 0x{}", hex::encode(&self.data)),
        }
    }
}

impl std::error::Error for Revert {}

// ================================
// Codec Errors
// ================================

#[derive(Error, Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum CodecError {
    #[error("Call payload is shorter than a selector")]
    MissingSelector,

    #[error("Malformed call arguments")]
    MalformedArguments,

    #[error("Malformed return data")]
    MalformedReturnData,

    #[error("Malformed stored value")]
    MalformedStorage,
}

impl RevertError for CodecError {
    const DOMAIN: &'static str = "CodecError";
}

impl From<CodecError> for Revert {
    fn from(err: CodecError) -> Self {
        Revert::error(&err)
    }
}
