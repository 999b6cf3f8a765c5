//! Contracts the tests deploy around accounts and aggregators

use borsh::{BorshDeserialize, BorshSerialize};
use vessel_account::OwnerOf;
use vessel_common::{decode_args, serve, split_selector, to_vec, Address, CallResult, Operation, Revert, RoleId, Selector};
use vessel_runtime::{slot, Contract, Env, Method, MethodTable};

fn unknown() -> CallResult {
    Err(Revert::reason("unknown operation"))
}

// ================================
// Identity Registry
// ================================

/// Minimal token registry: one owner per token id
pub struct IdentityRegistry {
    methods: MethodTable,
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        let mut methods = MethodTable::new();
        methods.register::<Mint>().register::<TransferToken>();
        Self { methods }
    }
}

fn token_key(token_id: u128) -> Vec<u8> {
    slot("registry.token", &token_id.to_be_bytes())
}

#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct Mint {
    pub token_id: u128,
    pub to: Address,
}

impl Operation for Mint {
    const SIGNATURE: &'static str = "mint(uint256,address)";
    type Output = Address;
}

#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct TransferToken {
    pub token_id: u128,
    pub to: Address,
}

impl Operation for TransferToken {
    const SIGNATURE: &'static str = "transferFrom(uint256,address)";
    type Output = Address;
}

fn owner_of(env: &mut Env<'_>, token_id: u128) -> Result<Address, Revert> {
    env.load::<Address>(&token_key(token_id))?
        .ok_or_else(|| Revert::reason("nonexistent token"))
}

impl Method for Mint {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Address, Revert> {
        if env.load::<Address>(&token_key(op.token_id))?.is_some() {
            return Err(Revert::reason("token exists"));
        }
        env.store(token_key(op.token_id), &op.to)?;
        Ok(op.to)
    }
}

impl Method for TransferToken {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<Address, Revert> {
        let owner = owner_of(env, op.token_id)?;
        if owner != env.caller() {
            return Err(Revert::reason("not token owner"));
        }
        env.store(token_key(op.token_id), &op.to)?;
        Ok(op.to)
    }
}

impl Contract for IdentityRegistry {
    fn name(&self) -> &str {
        "identity-registry"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult {
        match split_selector(input) {
            Some((selector, args)) if selector == OwnerOf::selector() => {
                serve::<OwnerOf, _>(args, |op| owner_of(env, op.token_id))
            }
            _ => self.methods.dispatch(env, input).unwrap_or_else(unknown),
        }
    }
}

// ================================
// Modules
// ================================

/// Answers every selector with its tag
pub struct TagModule(pub u8);

impl Contract for TagModule {
    fn name(&self) -> &str {
        "tag-module"
    }

    fn call(&self, _env: &mut Env<'_>, _input: &[u8]) -> CallResult {
        Ok(to_vec(&self.0))
    }
}

const COUNTER_KEY: &[u8] = b"counter";

/// Keeps a counter in whatever storage it runs against
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct Increment {
    pub by: u64,
}

impl Operation for Increment {
    const SIGNATURE: &'static str = "increment(uint64)";
    type Output = u64;
}

#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct Counter {}

impl Operation for Counter {
    const SIGNATURE: &'static str = "counter()";
    type Output = u64;
}

/// Storage context, code location and caller as the module sees them
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct Whoami {}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FrameView {
    pub address: Address,
    pub code_address: Address,
    pub caller: Address,
    pub delegated: bool,
}

impl Operation for Whoami {
    const SIGNATURE: &'static str = "whoami()";
    type Output = FrameView;
}

impl Method for Increment {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<u64, Revert> {
        let next = env.load::<u64>(COUNTER_KEY)?.unwrap_or(0) + op.by;
        env.store(COUNTER_KEY.to_vec(), &next)?;
        Ok(next)
    }
}

impl Method for Counter {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<u64, Revert> {
        Ok(env.load::<u64>(COUNTER_KEY)?.unwrap_or(0))
    }
}

impl Method for Whoami {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<FrameView, Revert> {
        Ok(FrameView {
            address: env.address(),
            code_address: env.code_address(),
            caller: env.caller(),
            delegated: env.is_delegated(),
        })
    }
}

pub struct CounterModule {
    methods: MethodTable,
}

impl Default for CounterModule {
    fn default() -> Self {
        let mut methods = MethodTable::new();
        methods.register::<Increment>().register::<Counter>().register::<Whoami>();
        Self { methods }
    }
}

impl CounterModule {
    pub fn operations() -> Vec<Selector> {
        vec![Increment::selector(), Counter::selector(), Whoami::selector()]
    }
}

impl Contract for CounterModule {
    fn name(&self) -> &str {
        "counter-module"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult {
        self.methods.dispatch(env, input).unwrap_or_else(unknown)
    }
}

/// Initializer run through `applyMutations`
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct Setup {
    pub value: u64,
    /// 0 succeeds, 1 reverts with a reason, 2 reverts without one
    pub failure: u8,
}

impl Operation for Setup {
    const SIGNATURE: &'static str = "setup(uint64,uint8)";
    type Output = bool;
}

pub const SETUP_KEY: &[u8] = b"setup";

pub struct InitModule;

impl Contract for InitModule {
    fn name(&self) -> &str {
        "init-module"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult {
        let Some((selector, args)) = split_selector(input) else {
            return unknown();
        };
        if selector != Setup::selector() {
            return unknown();
        }
        let setup: Setup = decode_args(args)?;
        env.store(SETUP_KEY.to_vec(), &setup.value)?;
        match setup.failure {
            0 => Ok(Vec::new()),
            1 => Err(Revert::reason("setup rejected")),
            _ => Err(Revert::empty()),
        }
    }
}

// ================================
// Call Targets
// ================================

/// Counts calls in its own storage and remembers the last caller and value
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct Record {
    pub tag: u64,
}

impl Operation for Record {
    const SIGNATURE: &'static str = "record(uint64)";
    type Output = u64;
}

#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct Recorded {}

#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Recording {
    pub count: u64,
    pub tag_sum: u64,
    pub last_caller: Address,
    pub last_value: u128,
}

impl Operation for Recorded {
    const SIGNATURE: &'static str = "recorded()";
    type Output = Recording;
}

const RECORDING_KEY: &[u8] = b"recording";

impl Method for Record {
    fn handle(env: &mut Env<'_>, op: Self) -> Result<u64, Revert> {
        let mut recording = env.load::<Recording>(RECORDING_KEY)?.unwrap_or_default();
        recording.count += 1;
        recording.tag_sum += op.tag;
        recording.last_caller = env.caller();
        recording.last_value = env.value();
        env.store(RECORDING_KEY.to_vec(), &recording)?;
        Ok(recording.count)
    }
}

impl Method for Recorded {
    fn handle(env: &mut Env<'_>, _op: Self) -> Result<Recording, Revert> {
        Ok(env.load::<Recording>(RECORDING_KEY)?.unwrap_or_default())
    }
}

pub struct Recorder {
    methods: MethodTable,
}

impl Default for Recorder {
    fn default() -> Self {
        let mut methods = MethodTable::new();
        methods.register::<Record>().register::<Recorded>();
        Self { methods }
    }
}

impl Contract for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult {
        self.methods.dispatch(env, input).unwrap_or_else(unknown)
    }
}

/// Always fails: with a reason when the first payload byte is odd, silently otherwise
pub struct Reverter;

pub const REVERT_REASON: &str = "reverter says no";

impl Contract for Reverter {
    fn name(&self) -> &str {
        "reverter"
    }

    fn call(&self, _env: &mut Env<'_>, input: &[u8]) -> CallResult {
        match input.first() {
            Some(b) if b % 2 == 1 => Err(Revert::reason(REVERT_REASON)),
            _ => Err(Revert::empty()),
        }
    }
}

/// Calls back into an account with a caller-chosen payload
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct CallBack {
    pub account: Address,
    pub payload: Vec<u8>,
}

impl Operation for CallBack {
    const SIGNATURE: &'static str = "callBack(address,bytes)";
    type Output = Vec<u8>;
}

pub struct ReentrantProbe;

impl Contract for ReentrantProbe {
    fn name(&self) -> &str {
        "reentrant-probe"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult {
        let Some((selector, args)) = split_selector(input) else {
            return Ok(Vec::new());
        };
        if selector != CallBack::selector() {
            return unknown();
        }
        let op: CallBack = decode_args(args)?;
        let data = env.call(op.account, 0, &op.payload)?;
        Ok(to_vec(&data))
    }
}

/// Charges computation until the budget runs out
pub struct Burner;

impl Contract for Burner {
    fn name(&self) -> &str {
        "burner"
    }

    fn call(&self, env: &mut Env<'_>, _input: &[u8]) -> CallResult {
        loop {
            env.charge("burn", 1_000_000)?;
        }
    }
}

/// Role id used for custom grants in tests
pub fn custom_role(name: &str) -> RoleId {
    RoleId::named(name)
}
