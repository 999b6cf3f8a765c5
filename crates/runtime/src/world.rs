// World state and the top-level invocation loop
//
// The world is the "surrounding platform": one top-level invocation runs to
// completion and either commits every effect or none. Inside an invocation
// each call frame snapshots the world before running, and a failing frame
// restores that snapshot and drops the logs it emitted, so a caller that
// tolerates a nested failure sees exactly the state from before the call.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, trace, warn};
use vessel_common::{decode_output, Address, CallResult, Operation, Revert};

use crate::config::RuntimeConfig;
use crate::contract::Contract;
use crate::env::Env;
use crate::error::HostError;
use crate::event_stream::{EventStream, Log, StreamEvent};
use crate::meter::{costs, ComputeMeter};
use crate::storage::Storage;

// ================================
// Account Records
// ================================

#[derive(Clone, Default)]
pub(crate) struct AccountRecord {
    pub(crate) balance: u128,
    pub(crate) code: Option<Arc<dyn Contract>>,
    pub(crate) storage: Storage,
}

impl std::fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRecord")
            .field("balance", &self.balance)
            .field("code", &self.code.as_ref().map(|c| c.name().to_string()))
            .field("slots", &self.storage.len())
            .finish()
    }
}

// ================================
// Frames
// ================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    /// Plain call: runs the target's code against the target's storage
    Call,
    /// Runs another address's code against the current storage, caller and value
    DelegateCall,
    /// Constructor run during deployment
    Construct,
}

/// Execution context of one frame
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub kind: CallKind,
    pub caller: Address,
    /// Storage context the code runs against
    pub address: Address,
    /// Where the running code was loaded from
    pub code_address: Address,
    pub value: u128,
    pub depth: u32,
}

struct Snapshot {
    accounts: BTreeMap<Address, AccountRecord>,
    logs: usize,
}

// ================================
// Transactions and Receipts
// ================================

#[derive(Debug, Clone)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub value: u128,
    pub input: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Receipt {
    pub index: u64,
    pub result: CallResult,
    /// Committed logs; empty when the invocation failed
    pub logs: Vec<Log>,
    pub computation_used: u64,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BlockInfo {
    pub number: u64,
    pub timestamp: u64,
}

// ================================
// World
// ================================

pub struct World {
    config: RuntimeConfig,
    pub(crate) accounts: BTreeMap<Address, AccountRecord>,
    block: BlockInfo,
    tx_count: u64,
    pub(crate) meter: ComputeMeter,
    pub(crate) logs: Vec<Log>,
    pub(crate) halt: Option<HostError>,
    events: EventStream,
}

impl Default for World {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl World {
    pub fn new(config: RuntimeConfig) -> Self {
        info!("Initializing world on chain {}", config.chain_id);
        Self {
            events: EventStream::new(config.event_buffer),
            meter: ComputeMeter::new(config.computation_budget),
            config,
            accounts: BTreeMap::new(),
            block: BlockInfo { number: 1, timestamp: 1_700_000_000 },
            tx_count: 0,
            logs: Vec::new(),
            halt: None,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    pub fn block(&self) -> BlockInfo {
        self.block
    }

    /// Move to the next block, `seconds` later
    pub fn advance_block(&mut self, seconds: u64) {
        self.block.number += 1;
        self.block.timestamp += seconds;
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<StreamEvent> {
        self.events.subscribe()
    }

    // ===== Direct state access (outside any invocation) =====

    pub fn balance(&self, address: Address) -> u128 {
        self.accounts.get(&address).map_or(0, |a| a.balance)
    }

    pub fn set_balance(&mut self, address: Address, balance: u128) {
        self.accounts.entry(address).or_default().balance = balance;
    }

    pub fn has_code(&self, address: Address) -> bool {
        self.accounts.get(&address).is_some_and(|a| a.code.is_some())
    }

    pub fn code_name(&self, address: Address) -> Option<String> {
        self.accounts
            .get(&address)
            .and_then(|a| a.code.as_ref())
            .map(|c| c.name().to_string())
    }

    /// Storage of `address`, for inspection
    pub fn storage(&self, address: Address) -> Option<&Storage> {
        self.accounts.get(&address).map(|a| &a.storage)
    }

    // ===== Top-level invocations =====

    /// Install `code` at `address` and run its constructor. A failing
    /// constructor leaves the address exactly as it was.
    pub fn deploy(
        &mut self,
        deployer: Address,
        address: Address,
        code: Arc<dyn Contract>,
        args: &[u8],
    ) -> Result<Address, Revert> {
        if address.is_zero() {
            return Err(HostError::ZeroAddressDeploy.into());
        }
        if self.has_code(address) {
            return Err(HostError::AlreadyDeployed(address).into());
        }

        info!("Deploying {} at {}", code.name(), address);
        self.begin_invocation();
        let snapshot = self.snapshot();
        self.accounts.entry(address).or_default().code = Some(code);

        let frame = Frame {
            kind: CallKind::Construct,
            caller: deployer,
            address,
            code_address: address,
            value: 0,
            depth: 0,
        };
        let result = self.run_frame(frame, args);
        let receipt = self.finish_invocation(result, snapshot);
        receipt.result.map(|_| address)
    }

    pub fn transact(&mut self, tx: Transaction) -> Receipt {
        debug!("Transaction {} -> {} ({} bytes, value {})", tx.from, tx.to, tx.input.len(), tx.value);
        self.begin_invocation();
        let snapshot = self.snapshot();

        let frame = Frame {
            kind: CallKind::Call,
            caller: tx.from,
            address: tx.to,
            code_address: tx.to,
            value: tx.value,
            depth: 0,
        };
        let result = self.run_frame(frame, &tx.input);
        self.finish_invocation(result, snapshot)
    }

    /// Send a typed operation as its own top-level invocation
    pub fn call<O: Operation>(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
        op: &O,
    ) -> Result<O::Output, Revert> {
        let receipt = self.transact(Transaction { from, to, value, input: op.encode() });
        decode_output(&receipt.result?)
    }

    fn begin_invocation(&mut self) {
        self.meter = ComputeMeter::new(self.config.computation_budget);
        self.logs.clear();
        self.halt = None;
        self.clear_transient();
    }

    fn finish_invocation(&mut self, result: CallResult, snapshot: Snapshot) -> Receipt {
        let index = self.tx_count;
        self.tx_count += 1;

        let result = match self.halt.take() {
            Some(halt) => {
                warn!("Invocation {} halted: {}", index, halt);
                Err(Revert::from(halt))
            }
            None => result,
        };

        let logs = match &result {
            Ok(_) => {
                info!("Invocation {} committed with {} logs", index, self.logs.len());
                let logs = std::mem::take(&mut self.logs);
                self.events.emit(StreamEvent::Committed { tx_index: index, logs: logs.clone() });
                logs
            }
            Err(revert) => {
                info!("Invocation {} reverted: {}", index, revert);
                self.restore(snapshot);
                self.logs.clear();
                self.events.emit(StreamEvent::Reverted { tx_index: index, revert: revert.clone() });
                Vec::new()
            }
        };
        self.clear_transient();

        Receipt {
            index,
            result,
            logs,
            computation_used: self.meter.used(),
        }
    }

    fn clear_transient(&mut self) {
        for record in self.accounts.values_mut() {
            record.storage.clear_transient();
        }
    }

    // ===== Frames =====

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.clone(),
            logs: self.logs.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.accounts = snapshot.accounts;
        self.logs.truncate(snapshot.logs);
    }

    /// Charge the meter; exhaustion halts the whole invocation
    pub(crate) fn charge(&mut self, category: &'static str, units: u64) -> Result<(), Revert> {
        if let Some(halt) = &self.halt {
            return Err(halt.clone().into());
        }
        if let Err(err) = self.meter.track(category, units) {
            warn!("Computation budget exhausted in {}: {}", category, err);
            self.halt = Some(err.clone());
            return Err(err.into());
        }
        Ok(())
    }

    /// Run a nested frame with rollback on failure
    pub(crate) fn nested_frame(&mut self, frame: Frame, input: &[u8]) -> CallResult {
        if frame.depth > self.config.max_call_depth {
            return Err(HostError::CallDepthExceeded(self.config.max_call_depth).into());
        }
        let snapshot = self.snapshot();
        let result = self.run_frame(frame, input);
        if result.is_err() || self.halt.is_some() {
            self.restore(snapshot);
        }
        match &self.halt {
            Some(halt) => Err(halt.clone().into()),
            None => result,
        }
    }

    fn run_frame(&mut self, frame: Frame, input: &[u8]) -> CallResult {
        self.charge("frame", costs::FRAME_BASE + costs::INPUT_BYTE * input.len() as u64)?;
        trace!(
            "Frame {:?} depth {} caller {} address {} code {}",
            frame.kind, frame.depth, frame.caller, frame.address, frame.code_address
        );

        if frame.kind == CallKind::Call && frame.value > 0 {
            self.charge("value", costs::VALUE_TRANSFER)?;
            self.transfer(frame.caller, frame.address, frame.value)?;
        }

        let code = self.accounts.get(&frame.code_address).and_then(|a| a.code.clone());
        let Some(code) = code else {
            // Plain addresses accept anything and return nothing
            return Ok(Vec::new());
        };

        let mut env = Env::new(self, frame);
        let result = match frame.kind {
            CallKind::Construct => code.construct(&mut env, input),
            CallKind::Call | CallKind::DelegateCall => code.call(&mut env, input),
        };
        if let Err(revert) = &result {
            debug!("{} at {} reverted: {}", code.name(), frame.address, revert);
        }
        result
    }

    fn transfer(&mut self, from: Address, to: Address, value: u128) -> Result<(), Revert> {
        let available = self.balance(from);
        if available < value {
            return Err(HostError::InsufficientBalance { needed: value, available }.into());
        }
        self.accounts.entry(from).or_default().balance = available - value;
        let recipient = self.accounts.entry(to).or_default();
        recipient.balance = recipient.balance.saturating_add(value);
        Ok(())
    }
}
