// Stored call log
//
// Append-only arena of submitted payloads with 1-based indices. There is no
// update or delete path: an index, once handed out, names the same record
// for the life of the aggregator.

use tracing::debug;
use vessel_common::Revert;
use vessel_runtime::{slot, Env};

use crate::error::AggregatorError;
use crate::events::CallStored;
use crate::state::StoredCall;

const LEN_KEY: &[u8] = b"vessel.aggregator.calls.len";
const RECORD_NAMESPACE: &str = "vessel.aggregator.call";

fn record_key(index: u64) -> Vec<u8> {
    slot(RECORD_NAMESPACE, &index.to_be_bytes())
}

pub fn len(env: &mut Env<'_>) -> Result<u64, Revert> {
    Ok(env.load::<u64>(LEN_KEY)?.unwrap_or(0))
}

/// Append `payload` and return its index
pub fn append(env: &mut Env<'_>, payload: &[u8]) -> Result<u64, Revert> {
    let index = len(env)? + 1;
    let record = StoredCall {
        submitter: env.caller(),
        block_number: env.block_number(),
        payload: payload.to_vec(),
    };
    env.store(record_key(index), &record)?;
    env.store(LEN_KEY.to_vec(), &index)?;
    env.emit(&CallStored {
        index,
        submitter: record.submitter,
        payload: record.payload,
    })?;
    debug!("Stored call {} from {}", index, env.caller());
    Ok(index)
}

pub fn get(env: &mut Env<'_>, index: u64) -> Result<StoredCall, Revert> {
    let len = len(env)?;
    if index == 0 || index > len {
        return Err(AggregatorError::OutOfRange { index, len }.into());
    }
    env.load::<StoredCall>(&record_key(index))?
        .ok_or_else(|| AggregatorError::OutOfRange { index, len }.into())
}
