use anyhow::Result;
use vessel_account::events::{Executed, RoleSet};
use vessel_account::AccountError;
use vessel_aggregator::events::CallStored;
use vessel_common::{Address, Operation, Role};
use vessel_runtime::{RuntimeConfig, StreamEvent};
use vessel_sdk::{watch, Multicall, RoleBatch, SdkError};
use vessel_tests::fixtures::{Record, Recorder};
use vessel_tests::TestContext;

#[tokio::test]
async fn test_watch_sees_committed_account_logs() -> Result<()> {
    let mut ctx = TestContext::new();
    let executor = Address::derive(b"executor");
    let recorder = ctx.deploy("recorder", Recorder::default());
    let mut stream = watch(&ctx.world, ctx.account);

    ctx.owner_client().grant_or_revoke(RoleBatch::new().grant(Role::Executor, executor))?;
    ctx.client_as(executor).execute_by_role(recorder, 0, Record { tag: 1 }.encode())?;

    let Some(StreamEvent::Committed { logs, .. }) = stream.recv().await else {
        panic!("expected a committed role update");
    };
    let granted: Vec<RoleSet> = logs.iter().filter_map(|l| l.decode::<RoleSet>()).collect();
    assert_eq!(granted, vec![RoleSet { role: Role::Executor.id(), account: executor, granted: true }]);

    let Some(StreamEvent::Committed { logs, .. }) = stream.recv().await else {
        panic!("expected a committed execution");
    };
    let executed = logs.iter().find_map(|l| l.decode::<Executed>());
    assert_eq!(executed, Some(Executed { target: recorder, value: 0, state: 2 }));
    // Observers without the event types read the JSON form
    assert_eq!(logs[0].fields["target"], recorder.to_string());
    Ok(())
}

#[tokio::test]
async fn test_watch_skips_reverted_invocations() -> Result<()> {
    let mut ctx = TestContext::new();
    let stranger = ctx.stranger;
    let mut stream = watch(&ctx.world, ctx.account);
    let mut everything = ctx.world.subscribe();

    let denied = ctx.client_as(stranger).grant_or_revoke(RoleBatch::new().grant(Role::Executor, stranger));
    assert_eq!(denied, Err(SdkError::Account(AccountError::Unauthorized)));

    assert!(stream.try_recv().is_none());
    assert!(matches!(everything.recv().await?, StreamEvent::Reverted { .. }));
    Ok(())
}

#[tokio::test]
async fn test_aggregator_log_events() -> Result<()> {
    let config = RuntimeConfig::from_lookup(|key| (key == "VESSEL_EVENT_BUFFER").then(|| "8".to_string()))?;
    let mut ctx = TestContext::with_config(config, vessel_account::MissPolicy::Revert);
    let operator = Address::derive(b"operator");
    let aggregator = ctx.deploy_aggregator(vec![operator]);
    let recorder = ctx.deploy("recorder", Recorder::default());
    let mut stream = watch(&ctx.world, aggregator);

    let calls = Multicall::new().call(recorder, &Record { tag: 1 }).call(recorder, &Record { tag: 2 });
    ctx.aggregator_as(aggregator, operator).send(&calls.aggregate_and_store())?;

    let Some(StreamEvent::Committed { logs, .. }) = stream.recv().await else {
        panic!("expected stored calls");
    };
    let indices: Vec<u64> = logs.iter().filter_map(|l| l.decode::<CallStored>()).map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 2]);
    Ok(())
}
