//! Shared setup for Vessel integration and property tests

use std::sync::{Arc, Once};

use vessel_account::{AccountInit, IdentityBinding, MissPolicy};
use vessel_aggregator::AggregatorInit;
use vessel_common::{Address, Operation};
use vessel_runtime::{Contract, RuntimeConfig, World};
use vessel_sdk::{deploy_account, deploy_aggregator, AccountClient, AggregatorClient};

pub mod fixtures;

use fixtures::{IdentityRegistry, Mint};

static TRACING: Once = Once::new();

/// Install a fmt subscriber filtered by `RUST_LOG`, once per test binary
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const TOKEN_ID: u128 = 1;

/// A world with an identity registry, one token and an account bound to it
pub struct TestContext {
    pub world: World,
    pub registry: Address,
    pub account: Address,
    pub owner: Address,
    pub stranger: Address,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(MissPolicy::Revert)
    }

    pub fn with_policy(miss_policy: MissPolicy) -> Self {
        Self::with_config(RuntimeConfig::default(), miss_policy)
    }

    pub fn with_config(config: RuntimeConfig, miss_policy: MissPolicy) -> Self {
        init_tracing();
        let chain_id = config.chain_id;
        let mut world = World::new(config);
        let deployer = Address::derive(b"deployer");
        let owner = Address::derive(b"owner");
        let stranger = Address::derive(b"stranger");

        let registry = Address::derive(b"identity-registry");
        world
            .deploy(deployer, registry, Arc::new(IdentityRegistry::default()), &[])
            .expect("registry deploys");
        world
            .call(owner, registry, 0, &Mint { token_id: TOKEN_ID, to: owner })
            .expect("token mints");

        let account = Address::derive(b"account");
        let init = AccountInit {
            binding: IdentityBinding { chain_id, registry, token_id: TOKEN_ID },
            miss_policy,
        };
        deploy_account(&mut world, deployer, account, init).expect("account deploys");

        Self { world, registry, account, owner, stranger }
    }

    /// Deploy `code` at an address derived from `label`
    pub fn deploy(&mut self, label: &str, code: impl Contract + 'static) -> Address {
        let address = Address::derive(label.as_bytes());
        self.world
            .deploy(Address::derive(b"deployer"), address, Arc::new(code), &[])
            .expect("fixture deploys");
        address
    }

    /// Deploy an aggregator owned by the account owner with the given operators
    pub fn deploy_aggregator(&mut self, operators: Vec<Address>) -> Address {
        let address = Address::derive(b"aggregator");
        let init = AggregatorInit { owner: self.owner, operators };
        deploy_aggregator(&mut self.world, self.owner, address, init).expect("aggregator deploys");
        address
    }

    /// Client for the account, sending as its owner
    pub fn owner_client(&mut self) -> AccountClient<'_> {
        AccountClient::new(&mut self.world, self.account, self.owner)
    }

    pub fn client_as(&mut self, caller: Address) -> AccountClient<'_> {
        AccountClient::new(&mut self.world, self.account, caller)
    }

    pub fn aggregator_as(&mut self, aggregator: Address, caller: Address) -> AggregatorClient<'_> {
        AggregatorClient::new(&mut self.world, aggregator, caller)
    }

    /// Call `target` as the stranger, expecting success
    pub fn query<O: Operation>(&mut self, target: Address, op: &O) -> O::Output {
        self.world
            .call(self.stranger, target, 0, op)
            .expect("query succeeds")
    }
}
