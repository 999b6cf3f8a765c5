//! Structured logs and the committed-event stream

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, error};
use vessel_common::{to_vec, Address, Revert};

/// A structured notification a contract can emit. Events carry the full new
/// state of whatever changed, never a delta.
pub trait Event: BorshSerialize + Serialize {
    const NAME: &'static str;
}

/// One emitted notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    /// Address whose storage context emitted the log
    pub emitter: Address,
    pub name: String,
    /// Borsh encoding of the event
    pub data: Vec<u8>,
    /// The same event as JSON, for observers that do not link the event types
    pub fields: serde_json::Value,
}

impl Log {
    pub fn new<E: Event>(emitter: Address, event: &E) -> Self {
        Self {
            emitter,
            name: E::NAME.to_string(),
            data: to_vec(event),
            fields: serde_json::to_value(event).unwrap_or(serde_json::Value::Null),
        }
    }

    pub fn is<E: Event>(&self) -> bool {
        self.name == E::NAME
    }

    pub fn decode<E: Event + BorshDeserialize>(&self) -> Option<E> {
        if !self.is::<E>() {
            return None;
        }
        E::try_from_slice(&self.data).ok()
    }
}

/// Events published after each top-level invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StreamEvent {
    /// A top-level invocation committed these logs
    Committed { tx_index: u64, logs: Vec<Log> },

    /// A top-level invocation was discarded
    Reverted { tx_index: u64, revert: Revert },
}

/// Broadcast stream of committed and reverted invocations
pub struct EventStream {
    sender: broadcast::Sender<StreamEvent>,
}

impl EventStream {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: StreamEvent) {
        match self.sender.send(event) {
            Ok(count) => debug!("Event sent to {} receivers", count),
            // No receivers, event is dropped
            Err(_) => debug!("No receivers for event"),
        }
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventStream {
    fn default() -> Self {
        Self::new(1024)
    }
}

// ================================
// Filtering
// ================================

/// Event filter for selective subscription
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub include_reverts: bool,
    /// Only keep logs from these emitters
    pub emitters: Option<Vec<Address>>,
    /// Only keep logs with these event names
    pub names: Option<Vec<String>>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            include_reverts: true,
            emitters: None,
            names: None,
        }
    }
}

impl EventFilter {
    pub fn matches_log(&self, log: &Log) -> bool {
        let emitter_ok = self.emitters.as_ref().map_or(true, |e| e.contains(&log.emitter));
        let name_ok = self.names.as_ref().map_or(true, |n| n.iter().any(|x| *x == log.name));
        emitter_ok && name_ok
    }

    /// Apply the filter; `None` when nothing survives
    pub fn apply(&self, event: StreamEvent) -> Option<StreamEvent> {
        match event {
            StreamEvent::Committed { tx_index, logs } => {
                let logs: Vec<_> = logs.into_iter().filter(|l| self.matches_log(l)).collect();
                (!logs.is_empty()).then_some(StreamEvent::Committed { tx_index, logs })
            }
            reverted @ StreamEvent::Reverted { .. } => self.include_reverts.then_some(reverted),
        }
    }
}

/// Filtered event stream wrapper
pub struct FilteredEventStream {
    receiver: broadcast::Receiver<StreamEvent>,
    filter: EventFilter,
}

impl FilteredEventStream {
    pub fn new(receiver: broadcast::Receiver<StreamEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive next filtered event
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if let Some(kept) = self.filter.apply(event) {
                        return Some(kept);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    error!("Event stream lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant for synchronous observers
    pub fn try_recv(&mut self) -> Option<StreamEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(kept) = self.filter.apply(event) {
                        return Some(kept);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    error!("Event stream lagged by {} events", n);
                }
                Err(_) => return None,
            }
        }
    }
}
