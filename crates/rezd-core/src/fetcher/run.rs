//! Fan-out/fan-in batch execution with a bounded in-flight budget.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::aggregate::Aggregator;
use crate::types::{Batch, Outcome, ResultMap};

use super::{decode, AssetFetch, FetchError};

/// Resolve a whole batch: one fetch-and-decode per asset id, at most
/// `max_in_flight` running at once. Queued ids start as slots free up.
/// Returns when every dispatched operation has reported. If `deadline` is
/// set and expires first, remaining operations are abandoned and the
/// partial map is returned.
///
/// Operations are independent: no retry, no cross-asset effect, and no
/// outcome can fail the batch itself. An empty batch returns an empty map
/// without touching the backend.
pub async fn resolve_batch(
    fetch: Arc<dyn AssetFetch>,
    batch: Batch,
    max_in_flight: usize,
    deadline: Option<Duration>,
) -> ResultMap {
    let mut aggregator = Aggregator::new(batch.len());
    if batch.is_empty() {
        return aggregator.finish();
    }

    let max_in_flight = max_in_flight.max(1);
    let mut queue: VecDeque<String> = batch.into_iter().collect();
    let mut join_set = JoinSet::new();
    let started = Instant::now();

    loop {
        while join_set.len() < max_in_flight {
            let Some(asset_id) = queue.pop_front() else {
                break;
            };
            let fetch = Arc::clone(&fetch);
            join_set.spawn(async move {
                let outcome = resolve_one(fetch.as_ref(), &asset_id).await;
                (asset_id, outcome)
            });
        }

        if join_set.is_empty() {
            break;
        }

        let joined = match deadline {
            None => join_set.join_next().await,
            Some(d) => {
                let remaining = d.saturating_sub(started.elapsed());
                match tokio::time::timeout(remaining, join_set.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        tracing::warn!(
                            abandoned = join_set.len() + queue.len(),
                            "batch deadline exceeded, returning partial results"
                        );
                        join_set.abort_all();
                        break;
                    }
                }
            }
        };

        let Some(res) = joined else {
            break;
        };
        match res {
            Ok((asset_id, outcome)) => aggregator.record(asset_id, outcome),
            // A panicked fetch task is just that asset's failure.
            Err(e) => tracing::error!("fetch task join: {}", e),
        }
    }

    aggregator.finish()
}

/// One fetch-and-decode operation. Every failure path is logged here with
/// its cause and folded into `Outcome::Failed`.
async fn resolve_one(fetch: &dyn AssetFetch, asset_id: &str) -> Outcome {
    let body = match fetch.fetch(asset_id).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(asset_id, cause = %e, "FAILED");
            return Outcome::Failed(e);
        }
    };

    if body.is_empty() {
        tracing::warn!(asset_id, "EMPTY RESPONSE");
        return Outcome::Failed(FetchError::EmptyBody);
    }

    match decode::dimensions_from_bytes(&body) {
        Ok(dim) => {
            tracing::info!(asset_id, width = dim.x, height = dim.y, "SUCCESS");
            Outcome::Resolved(dim)
        }
        Err(e) => {
            tracing::warn!(asset_id, cause = %e, "FAILED");
            Outcome::Failed(e)
        }
    }
}
