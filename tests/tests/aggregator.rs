use anyhow::Result;
use borsh::BorshDeserialize;
use vessel_aggregator::events::CallStored;
use vessel_aggregator::*;
use vessel_common::{Address, Operation};
use vessel_runtime::{HostError, RuntimeConfig, Transaction};
use vessel_sdk::{decode_outcome, Multicall, SdkError};
use vessel_tests::fixtures::{Burner, Record, Recorded, Recorder, Recording, Reverter, REVERT_REASON};
use vessel_tests::TestContext;

struct Setup {
    ctx: TestContext,
    aggregator: Address,
    operator: Address,
    recorder: Address,
    reverter: Address,
}

fn setup() -> Setup {
    setup_with(RuntimeConfig::default())
}

fn setup_with(config: RuntimeConfig) -> Setup {
    let mut ctx = TestContext::with_config(config, vessel_account::MissPolicy::Revert);
    let operator = Address::derive(b"operator");
    let aggregator = ctx.deploy_aggregator(vec![operator]);
    let recorder = ctx.deploy("recorder", Recorder::default());
    let reverter = ctx.deploy("reverter", Reverter);
    Setup { ctx, aggregator, operator, recorder, reverter }
}

fn recording(s: &mut Setup) -> Recording {
    s.ctx.query(s.recorder, &Recorded {})
}

#[test]
fn test_operator_gate() -> Result<()> {
    let mut s = setup();
    let (owner, stranger) = (s.ctx.owner, s.ctx.stranger);
    let calls = Multicall::new().call(s.recorder, &Record { tag: 1 });

    let denied = s.ctx.aggregator_as(s.aggregator, stranger).aggregate(&calls);
    assert_eq!(denied, Err(SdkError::Aggregator(AggregatorError::NotOperator(stranger))));
    // Owning the aggregator is not the same as operating it
    let owner_denied = s.ctx.aggregator_as(s.aggregator, owner).aggregate(&calls);
    assert_eq!(owner_denied, Err(SdkError::Aggregator(AggregatorError::NotOperator(owner))));

    let data = s.ctx.aggregator_as(s.aggregator, s.operator).aggregate(&calls)?;
    assert_eq!(u64::try_from_slice(&data[0])?, 1);
    assert_eq!(recording(&mut s).last_caller, s.aggregator);
    Ok(())
}

#[test]
fn test_aggregate_bubbles_first_failure() -> Result<()> {
    let mut s = setup();
    let calls = Multicall::new()
        .call(s.recorder, &Record { tag: 1 })
        .raw(s.reverter, vec![1], false, 0);
    let loud = s.ctx.aggregator_as(s.aggregator, s.operator).aggregate(&calls);
    assert_eq!(loud, Err(SdkError::Reason(REVERT_REASON.into())));

    let calls = Multicall::new()
        .call(s.recorder, &Record { tag: 1 })
        .raw(s.reverter, vec![2], false, 0);
    let silent = s.ctx.aggregator_as(s.aggregator, s.operator).aggregate(&calls);
    assert_eq!(silent, Err(SdkError::Aggregator(AggregatorError::CallFailed { index: 1 })));

    assert_eq!(recording(&mut s).count, 0);
    Ok(())
}

#[test]
fn test_try_aggregate_modes() -> Result<()> {
    let mut s = setup();
    let calls = Multicall::new()
        .call(s.recorder, &Record { tag: 1 })
        .raw(s.reverter, vec![1], false, 0);

    let strict = s.ctx.aggregator_as(s.aggregator, s.operator).send(&calls.try_aggregate(true));
    assert!(strict.is_err());

    let lenient = s.ctx.aggregator_as(s.aggregator, s.operator).send(&calls.try_aggregate(false))?;
    assert!(lenient[0].success);
    assert!(!lenient[1].success);
    assert_eq!(
        vessel_common::Revert::new(lenient[1].data.clone()).as_reason().as_deref(),
        Some(REVERT_REASON)
    );
    assert_eq!(decode_outcome::<Record>(&lenient[0])?, 1);
    assert_eq!(recording(&mut s).count, 1);
    Ok(())
}

#[test]
fn test_aggregate3_per_call_tolerance() -> Result<()> {
    let mut s = setup();
    let tolerant = Multicall::new()
        .try_call(s.reverter, &Record { tag: 1 })
        .call(s.recorder, &Record { tag: 2 });
    let results = s.ctx.aggregator_as(s.aggregator, s.operator).aggregate3(&tolerant)?;
    assert_eq!(results.len(), 2);
    assert!(!results[0].success);
    assert!(results[1].success);

    let strict = Multicall::new()
        .call(s.recorder, &Record { tag: 4 })
        .call(s.reverter, &Record { tag: 1 });
    assert!(s.ctx.aggregator_as(s.aggregator, s.operator).aggregate3(&strict).is_err());
    assert_eq!(recording(&mut s).tag_sum, 2);
    Ok(())
}

#[test]
fn test_aggregate3_all_failures_tolerated() -> Result<()> {
    let mut s = setup();
    let calls = (0..5u8).fold(Multicall::new(), |m, i| m.raw(s.reverter, vec![i], true, 0));
    let results = s.ctx.aggregator_as(s.aggregator, s.operator).aggregate3(&calls)?;
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| !r.success));
    Ok(())
}

#[test]
fn test_aggregate3_value_requires_exact_value() -> Result<()> {
    let mut s = setup();
    let operator = s.operator;
    s.ctx.world.set_balance(operator, 1_000);
    let calls = Multicall::new()
        .raw(s.recorder, Record { tag: 1 }.encode(), false, 30)
        .raw(s.recorder, Record { tag: 2 }.encode(), false, 70);

    let short = s.ctx.aggregator_as(s.aggregator, operator).send_value(&calls.aggregate3_value(), 99);
    assert_eq!(
        short,
        Err(SdkError::Aggregator(AggregatorError::ValueMismatch { attached: 99, required: 100 }))
    );
    assert_eq!(recording(&mut s).count, 0);

    s.ctx.aggregator_as(s.aggregator, operator).aggregate3_value(&calls)?;
    assert_eq!(s.ctx.world.balance(s.recorder), 100);
    assert_eq!(s.ctx.world.balance(operator), 900);
    assert_eq!(recording(&mut s).last_value, 70);
    Ok(())
}

#[test]
fn test_aggregate3_value_rejects_overflowing_sum() -> Result<()> {
    let mut s = setup();
    let operator = s.operator;
    s.ctx.world.set_balance(operator, u128::MAX);
    let calls = Multicall::new()
        .raw(s.recorder, Record { tag: 1 }.encode(), true, u128::MAX)
        .raw(s.recorder, Record { tag: 2 }.encode(), true, 5);

    let result = s.ctx.aggregator_as(s.aggregator, operator).send_value(&calls.aggregate3_value(), u128::MAX);
    assert!(matches!(
        result,
        Err(SdkError::Aggregator(AggregatorError::ValueMismatch { attached: u128::MAX, .. }))
    ));
    assert_eq!(s.ctx.world.balance(operator), u128::MAX);
    assert_eq!(recording(&mut s).count, 0);
    Ok(())
}

#[test]
fn test_unvalued_forms_reject_attached_value() -> Result<()> {
    let mut s = setup();
    let operator = s.operator;
    s.ctx.world.set_balance(operator, 100);
    let calls = Multicall::new().call(s.recorder, &Record { tag: 1 });
    let mismatch = Err(SdkError::Aggregator(AggregatorError::ValueMismatch { attached: 10, required: 0 }));

    let mut client = s.ctx.aggregator_as(s.aggregator, operator);
    assert_eq!(client.send_value(&calls.aggregate(), 10).map(|_| ()), mismatch.clone());
    assert_eq!(client.send_value(&calls.try_aggregate(false), 10).map(|_| ()), mismatch.clone());
    assert_eq!(client.send_value(&calls.aggregate3(), 10).map(|_| ()), mismatch.clone());
    assert_eq!(client.send_value(&calls.aggregate_and_store(), 10).map(|_| ()), mismatch.clone());
    client.send(&calls.aggregate_and_store())?;
    let replay = client.send_value(&AggregateFromStorage { target: s.recorder, index: 1 }, 10);
    assert_eq!(replay.map(|_| ()), mismatch);

    assert_eq!(s.ctx.world.balance(operator), 100);
    assert_eq!(s.ctx.world.balance(s.aggregator), 0);
    assert_eq!(recording(&mut s).count, 1);
    Ok(())
}

#[test]
fn test_block_and_aggregate() -> Result<()> {
    let mut s = setup();
    s.ctx.world.advance_block(12);
    let number = s.ctx.world.block().number;
    let calls = Multicall::new()
        .call(s.recorder, &Record { tag: 1 })
        .raw(s.reverter, vec![1], false, 0);

    let soft = s
        .ctx
        .aggregator_as(s.aggregator, s.operator)
        .send(&TryBlockAndAggregate { require_success: false, calls: calls.aggregate().calls })?;
    assert_eq!(soft.block_number, number);
    assert_eq!(soft.results.len(), 2);

    let hard = s
        .ctx
        .aggregator_as(s.aggregator, s.operator)
        .send(&BlockAndAggregate { calls: calls.aggregate().calls });
    assert!(hard.is_err());
    Ok(())
}

#[test]
fn test_store_and_replay() -> Result<()> {
    let mut s = setup();
    let operator = s.operator;
    let calls = Multicall::new()
        .call(s.recorder, &Record { tag: 5 })
        .call(s.recorder, &Record { tag: 6 });

    let stored = s.ctx.aggregator_as(s.aggregator, operator).send(&calls.aggregate_and_store())?;
    assert_eq!(stored.indices, vec![1, 2]);
    assert_eq!(stored.return_data.len(), 2);

    let mut client = s.ctx.aggregator_as(s.aggregator, operator);
    assert_eq!(client.stored_call_count()?, 2);
    let record = client.stored_call(2)?;
    assert_eq!(record.submitter, operator);
    assert_eq!(record.payload, Record { tag: 6 }.encode());

    let replayed = client.send(&AggregateFromStorage { target: s.recorder, index: 1 })?;
    assert_eq!(u64::try_from_slice(&replayed)?, 3);
    client.send(&AggregateFromStorageBatch { target: s.recorder, indices: vec![2, 1] })?;

    let rec = recording(&mut s);
    assert_eq!(rec.count, 5);
    assert_eq!(rec.tag_sum, 5 + 6 + 5 + 6 + 5);
    assert_eq!(rec.last_value, 0);
    Ok(())
}

#[test]
fn test_replay_index_resolution() -> Result<()> {
    let mut s = setup();
    let operator = s.operator;
    let calls = Multicall::new().call(s.recorder, &Record { tag: 1 });
    s.ctx.aggregator_as(s.aggregator, operator).send(&calls.aggregate_and_store())?;

    let mut client = s.ctx.aggregator_as(s.aggregator, operator);
    for index in [0, 2] {
        let result = client.send(&AggregateFromStorage { target: s.recorder, index });
        assert_eq!(result, Err(SdkError::Aggregator(AggregatorError::OutOfRange { index, len: 1 })));
    }
    // An unresolvable index aborts even a tolerant replay
    let tolerant = client.send(&Aggregate3FromStorage {
        calls: vec![
            StoredCall3 { target: s.recorder, index: 1, allow_failure: true },
            StoredCall3 { target: s.recorder, index: 9, allow_failure: true },
        ],
    });
    assert_eq!(tolerant, Err(SdkError::Aggregator(AggregatorError::OutOfRange { index: 9, len: 1 })));

    let replayed = client.send(&Aggregate3FromStorage {
        calls: vec![
            StoredCall3 { target: s.reverter, index: 1, allow_failure: true },
            StoredCall3 { target: s.recorder, index: 1, allow_failure: false },
        ],
    })?;
    assert!(!replayed[0].success);
    assert!(replayed[1].success);
    Ok(())
}

#[test]
fn test_failed_atomic_batch_stores_nothing() -> Result<()> {
    let mut s = setup();
    let operator = s.operator;
    let calls = Multicall::new()
        .call(s.recorder, &Record { tag: 1 })
        .raw(s.reverter, vec![1], false, 0);
    assert!(s.ctx.aggregator_as(s.aggregator, operator).send(&calls.aggregate_and_store()).is_err());
    assert_eq!(s.ctx.aggregator_as(s.aggregator, operator).stored_call_count()?, 0);

    // Tolerated failures are stored like any other call
    let tolerant = Multicall::new()
        .try_call(s.reverter, &Record { tag: 1 })
        .call(s.recorder, &Record { tag: 2 });
    let stored = s.ctx.aggregator_as(s.aggregator, operator).send(&tolerant.aggregate3_and_store())?;
    assert_eq!(stored.indices, vec![1, 2]);
    assert!(!stored.results[0].success);
    Ok(())
}

#[test]
fn test_store_events() -> Result<()> {
    let mut s = setup();
    let (operator, aggregator) = (s.operator, s.aggregator);
    let payload = Record { tag: 3 }.encode();
    let op = Multicall::new().raw(s.recorder, payload.clone(), false, 0).aggregate3_and_store();

    let receipt = s.ctx.world.transact(Transaction { from: operator, to: aggregator, value: 0, input: op.encode() });
    assert!(receipt.is_success());
    let stored: Vec<CallStored> = receipt.logs.iter().filter_map(|l| l.decode::<CallStored>()).collect();
    assert_eq!(stored, vec![CallStored { index: 1, submitter: operator, payload }]);
    Ok(())
}

#[test]
fn test_ownership_and_operators() -> Result<()> {
    let mut s = setup();
    let (owner, stranger, operator) = (s.ctx.owner, s.ctx.stranger, s.operator);
    let newcomer = Address::derive(b"newcomer");

    let denied = s.ctx.aggregator_as(s.aggregator, operator).set_operators(vec![OperatorUpdate {
        operator: stranger,
        allowed: true,
    }]);
    assert_eq!(denied, Err(SdkError::Aggregator(AggregatorError::NotOwner(operator))));

    let mut client = s.ctx.aggregator_as(s.aggregator, owner);
    let operators = client.set_operators(vec![
        OperatorUpdate { operator: newcomer, allowed: true },
        OperatorUpdate { operator, allowed: false },
    ])?;
    assert_eq!(operators, vec![newcomer]);
    assert!(client.is_operator(newcomer)?);
    assert!(!client.is_operator(operator)?);

    let zero = client.set_operators(vec![OperatorUpdate { operator: Address::ZERO, allowed: true }]);
    assert_eq!(zero, Err(SdkError::Aggregator(AggregatorError::ZeroAddress)));
    assert_eq!(client.transfer_ownership(Address::ZERO), Err(SdkError::Aggregator(AggregatorError::ZeroAddress)));

    client.transfer_ownership(stranger)?;
    assert_eq!(client.send(&Owner {})?, stranger);
    let old = client.set_operators(Vec::new());
    assert_eq!(old, Err(SdkError::Aggregator(AggregatorError::NotOwner(owner))));
    Ok(())
}

#[test]
fn test_views_are_ungated() -> Result<()> {
    let mut s = setup();
    let stranger = s.ctx.stranger;
    s.ctx.world.set_balance(stranger, 42);
    let block = s.ctx.world.block();
    let chain_id = s.ctx.world.chain_id();

    let mut client = s.ctx.aggregator_as(s.aggregator, stranger);
    assert_eq!(client.send(&GetBalance { account: stranger })?, 42);
    assert_eq!(client.send(&BlockNumber {})?, block.number);
    assert_eq!(client.send(&Timestamp {})?, block.timestamp);
    assert_eq!(client.send(&ChainId {})?, chain_id);
    assert_eq!(client.send(&StoredCallCount {})?, 0);
    assert_eq!(
        client.send(&GetStoredCall { index: 1 }),
        Err(SdkError::Aggregator(AggregatorError::OutOfRange { index: 1, len: 0 }))
    );
    Ok(())
}

#[test]
fn test_budget_exhaustion_is_not_tolerated() -> Result<()> {
    let mut s = setup_with(RuntimeConfig { computation_budget: 5_000_000, ..RuntimeConfig::default() });
    let burner = s.ctx.deploy("burner", Burner);
    let calls = Multicall::new()
        .call(s.recorder, &Record { tag: 1 })
        .raw(burner, Vec::new(), true, 0);

    let result = s.ctx.aggregator_as(s.aggregator, s.operator).aggregate3(&calls);
    assert!(matches!(
        result,
        Err(SdkError::Host(HostError::ComputeBudgetExceeded { .. }))
    ));
    assert_eq!(recording(&mut s).count, 0);
    Ok(())
}
