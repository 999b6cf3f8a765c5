use std::collections::BTreeMap;

use vessel_common::{serve, split_selector, CallResult, Operation, Revert, Selector};

use crate::env::Env;

/// Deployed behavior. Contracts hold no state of their own: everything they
/// persist goes through [`Env`] into the storage of the address they run as,
/// which is what lets the same code run against another address's storage.
pub trait Contract: Send + Sync {
    /// Name used in logs and traces
    fn name(&self) -> &str;

    /// Runs once when the code is deployed
    fn construct(&self, _env: &mut Env<'_>, _args: &[u8]) -> CallResult {
        Ok(Vec::new())
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult;
}

/// An operation a contract serves directly from its own code
pub trait Method: Operation {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Self::Output, Revert>;
}

pub type Handler = fn(&mut Env<'_>, &[u8]) -> CallResult;

/// Decode, run and encode one method
pub fn entry<O: Method>(env: &mut Env<'_>, args: &[u8]) -> CallResult {
    serve::<O, _>(args, |op| O::handle(env, op))
}

/// Selector-keyed table of a contract's methods
#[derive(Default, Clone)]
pub struct MethodTable {
    handlers: BTreeMap<Selector, Handler>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<O: Method>(&mut self) -> &mut Self {
        self.handlers.insert(O::selector(), entry::<O>);
        self
    }

    pub fn get(&self, selector: &Selector) -> Option<Handler> {
        self.handlers.get(selector).copied()
    }

    pub fn contains(&self, selector: &Selector) -> bool {
        self.handlers.contains_key(selector)
    }

    pub fn selectors(&self) -> Vec<Selector> {
        self.handlers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the method for `input`'s selector, if this table has one
    pub fn dispatch(&self, env: &mut Env<'_>, input: &[u8]) -> Option<CallResult> {
        let (selector, args) = split_selector(input)?;
        let handler = self.get(&selector)?;
        Some(handler(env, args))
    }
}
