//! Per-address key/value storage
//!
//! Values are borsh-encoded. Persistent slots live until cleared; transient
//! slots are wiped by the host at the start and end of every top-level
//! invocation.

use std::collections::BTreeMap;

/// Build a storage key from a namespace and a binary suffix
pub fn slot(namespace: &str, suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(namespace.len() + 1 + suffix.len());
    key.extend_from_slice(namespace.as_bytes());
    key.push(b':');
    key.extend_from_slice(suffix);
    key
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Storage {
    persistent: BTreeMap<Vec<u8>, Vec<u8>>,
    transient: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Storage {
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.persistent.get(key).map(Vec::as_slice)
    }

    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.persistent.insert(key, value);
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.persistent.remove(key)
    }

    pub fn get_transient(&self, key: &[u8]) -> Option<&[u8]> {
        self.transient.get(key).map(Vec::as_slice)
    }

    pub fn set_transient(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.transient.insert(key, value);
    }

    pub fn clear_transient(&mut self) {
        self.transient.clear();
    }

    pub fn len(&self) -> usize {
        self.persistent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persistent.is_empty()
    }
}
