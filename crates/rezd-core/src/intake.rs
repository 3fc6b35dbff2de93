//! Request batch intake: strict decode of the resolution request body.
//!
//! The accepted shape is `{"asset_ids": [string, ...]}`. Anything else
//! (missing field, wrong types, non-JSON body) is an `InvalidRequest` the
//! transport layer reports as a client error. Asset ids themselves are not
//! validated, deduplicated, or reordered; a malformed id simply fails at
//! fetch time like any other.

use serde::Deserialize;
use thiserror::Error;

use crate::types::Batch;

/// Accepted request body. Unknown extra fields are tolerated.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub asset_ids: Vec<String>,
}

/// Structurally invalid request body. The only error that fails a whole batch.
#[derive(Debug, Error)]
#[error("invalid request: expected {{\"asset_ids\": [string, ...]}} ({reason})")]
pub struct InvalidRequest {
    reason: String,
}

/// Parse a raw request body into an ordered batch of asset ids.
/// An empty list is valid and yields an empty batch.
pub fn parse(body: &[u8]) -> Result<Batch, InvalidRequest> {
    let req: ResolveRequest = serde_json::from_slice(body).map_err(|e| InvalidRequest {
        reason: e.to_string(),
    })?;
    Ok(req.asset_ids)
}
