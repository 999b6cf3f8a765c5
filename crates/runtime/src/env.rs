//! What a running contract sees of the world

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{debug, trace};
use vessel_common::{decode_output, to_vec, Address, CallResult, CodecError, Operation, Revert};

use crate::event_stream::{Event, Log};
use crate::meter::costs;
use crate::world::{CallKind, Frame, World};

/// Handle given to contract code for the duration of one frame. Storage
/// access always targets the frame's storage context, which under a
/// delegate call is the delegating address, not the code's own.
pub struct Env<'w> {
    world: &'w mut World,
    frame: Frame,
}

impl<'w> Env<'w> {
    pub(crate) fn new(world: &'w mut World, frame: Frame) -> Self {
        Self { world, frame }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Storage context of this frame
    pub fn address(&self) -> Address {
        self.frame.address
    }

    pub fn code_address(&self) -> Address {
        self.frame.code_address
    }

    pub fn caller(&self) -> Address {
        self.frame.caller
    }

    pub fn value(&self) -> u128 {
        self.frame.value
    }

    pub fn is_delegated(&self) -> bool {
        self.frame.kind == CallKind::DelegateCall
    }

    pub fn chain_id(&self) -> u64 {
        self.world.chain_id()
    }

    pub fn block_number(&self) -> u64 {
        self.world.block().number
    }

    pub fn timestamp(&self) -> u64 {
        self.world.block().timestamp
    }

    pub fn balance(&self, address: Address) -> u128 {
        self.world.balance(address)
    }

    pub fn has_code(&self, address: Address) -> bool {
        self.world.has_code(address)
    }

    pub fn charge(&mut self, category: &'static str, units: u64) -> Result<(), Revert> {
        self.world.charge(category, units)
    }

    // ===== Persistent storage =====

    pub fn load_raw(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, Revert> {
        self.charge("storage_read", costs::STORAGE_READ)?;
        Ok(self
            .world
            .accounts
            .get(&self.frame.address)
            .and_then(|a| a.storage.get(key))
            .map(<[u8]>::to_vec))
    }

    pub fn load<T: BorshDeserialize>(&mut self, key: &[u8]) -> Result<Option<T>, Revert> {
        match self.load_raw(key)? {
            Some(raw) => T::try_from_slice(&raw)
                .map(Some)
                .map_err(|_| CodecError::MalformedStorage.into()),
            None => Ok(None),
        }
    }

    pub fn store<T: BorshSerialize + ?Sized>(&mut self, key: Vec<u8>, value: &T) -> Result<(), Revert> {
        self.charge("storage_write", costs::STORAGE_WRITE)?;
        trace!("store {} bytes at {}", key.len(), self.frame.address);
        self.world
            .accounts
            .entry(self.frame.address)
            .or_default()
            .storage
            .set(key, to_vec(value));
        Ok(())
    }

    pub fn clear(&mut self, key: &[u8]) -> Result<(), Revert> {
        self.charge("storage_write", costs::STORAGE_WRITE)?;
        if let Some(record) = self.world.accounts.get_mut(&self.frame.address) {
            record.storage.remove(key);
        }
        Ok(())
    }

    // ===== Transient storage =====

    pub fn load_transient<T: BorshDeserialize>(&mut self, key: &[u8]) -> Result<Option<T>, Revert> {
        self.charge("transient_read", costs::TRANSIENT_READ)?;
        let raw = self
            .world
            .accounts
            .get(&self.frame.address)
            .and_then(|a| a.storage.get_transient(key))
            .map(<[u8]>::to_vec);
        match raw {
            Some(raw) => T::try_from_slice(&raw)
                .map(Some)
                .map_err(|_| CodecError::MalformedStorage.into()),
            None => Ok(None),
        }
    }

    pub fn store_transient<T: BorshSerialize + ?Sized>(&mut self, key: Vec<u8>, value: &T) -> Result<(), Revert> {
        self.charge("transient_write", costs::TRANSIENT_WRITE)?;
        self.world
            .accounts
            .entry(self.frame.address)
            .or_default()
            .storage
            .set_transient(key, to_vec(value));
        Ok(())
    }

    // ===== Calls =====

    fn child(&self, kind: CallKind, address: Address, code_address: Address, value: u128) -> Frame {
        let caller = match kind {
            CallKind::DelegateCall => self.frame.caller,
            _ => self.frame.address,
        };
        Frame {
            kind,
            caller,
            address,
            code_address,
            value,
            depth: self.frame.depth + 1,
        }
    }

    /// Call `target` with this frame's address as the caller. Effects of a
    /// failing call are rolled back before the error is returned.
    pub fn call(&mut self, target: Address, value: u128, payload: &[u8]) -> CallResult {
        debug!("{} calls {} ({} bytes, value {})", self.frame.address, target, payload.len(), value);
        let frame = self.child(CallKind::Call, target, target, value);
        self.world.nested_frame(frame, payload)
    }

    pub fn call_op<O: Operation>(&mut self, target: Address, value: u128, op: &O) -> Result<O::Output, Revert> {
        let data = self.call(target, value, &op.encode())?;
        decode_output(&data)
    }

    /// Run the code at `code` in this frame's storage context, keeping the
    /// current caller and value
    pub fn delegate_call(&mut self, code: Address, payload: &[u8]) -> CallResult {
        debug!("{} delegates to {} ({} bytes)", self.frame.address, code, payload.len());
        let frame = self.child(CallKind::DelegateCall, self.frame.address, code, self.frame.value);
        self.world.nested_frame(frame, payload)
    }

    // ===== Logs =====

    pub fn emit<E: Event>(&mut self, event: &E) -> Result<(), Revert> {
        let log = Log::new(self.frame.address, event);
        self.charge("log", costs::LOG_BASE + costs::LOG_BYTE * log.data.len() as u64)?;
        trace!("{} emits {}", self.frame.address, log.name);
        self.world.logs.push(log);
        Ok(())
    }
}
