//! Bounded concurrent fetch-and-decode of asset payloads.
//!
//! One retrieval per asset id, at most `max_in_flight` in flight at once.
//! Each operation fails or resolves on its own; nothing an asset does can
//! fail the batch. The network seam is the [`AssetFetch`] trait so tests
//! can stand in a simulated backend for the delivery endpoint.

mod client;
mod decode;
mod error;
mod run;


use async_trait::async_trait;
use bytes::Bytes;

pub use client::DeliveryClient;
pub use decode::dimensions_from_bytes;
pub use error::FetchError;
pub use run::resolve_batch;

/// Retrieval of one asset's raw payload from the delivery backend.
/// Implementations are shared across all concurrent operations and across
/// batches, so they must be internally immutable.
#[async_trait]
pub trait AssetFetch: Send + Sync {
    /// Fetch the binary content for `asset_id`. Timeout, non-success status,
    /// and transport failures are reported as [`FetchError`]; an empty body
    /// is returned as-is and classified by the caller.
    async fn fetch(&self, asset_id: &str) -> Result<Bytes, FetchError>;
}
