//! Core engine for rezd, the batch image-resolution service.
//!
//! Given a batch of opaque asset ids, fetch each asset's binary payload from
//! a remote delivery endpoint, decode the image container header, and return
//! a map of asset id to pixel dimensions. Fetches run concurrently under a
//! bounded in-flight budget; each asset fails or resolves independently.

pub mod config;
pub mod logging;

pub mod aggregate;
pub mod fetcher;
pub mod intake;
pub mod types;
