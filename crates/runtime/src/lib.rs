//! Vessel Runtime
//!
//! Single-process execution host for Vessel contracts: accounts with balance,
//! code and storage, nested call frames with rollback, transient storage
//! scoped to one top-level invocation, and a metered computation budget.

pub mod config;
pub mod contract;
pub mod env;
pub mod error;
pub mod event_stream;
pub mod meter;
pub mod storage;
pub mod world;

pub use config::RuntimeConfig;
pub use contract::{entry, Contract, Handler, Method, MethodTable};
pub use env::Env;
pub use error::{ConfigError, HostError};
pub use event_stream::{Event, EventFilter, EventStream, FilteredEventStream, Log, StreamEvent};
pub use meter::{costs, ComputeMeter};
pub use storage::{slot, Storage};
pub use world::{BlockInfo, CallKind, Frame, Receipt, Transaction, World};
