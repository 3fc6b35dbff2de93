//! Shared data model: batches, dimensions, per-asset outcomes.

use serde::Serialize;
use std::collections::HashMap;

use crate::fetcher::FetchError;

/// Pixel size of a decoded image. Serialized as `{"x": width, "y": height}`
/// to match the response shape consumed by the plugin side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub x: u32,
    pub y: u32,
}

/// Ordered asset ids from one request. Duplicates are allowed and not
/// deduplicated; the result map naturally holds one entry per distinct id.
pub type Batch = Vec<String>;

/// Final mapping of asset id to dimension. Only resolved assets appear;
/// a missing key means "could not be resolved", with no reason code.
pub type ResultMap = HashMap<String, Dimension>;

/// Result of one fetch-and-decode attempt. Produced exactly once per
/// dispatched asset id. The failure reason is carried here so a boundary
/// layer could surface it later, but the current HTTP contract drops it.
#[derive(Debug)]
pub enum Outcome {
    Resolved(Dimension),
    Failed(FetchError),
}
