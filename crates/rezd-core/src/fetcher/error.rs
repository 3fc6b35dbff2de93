//! Per-asset failure causes.
//!
//! Every variant is recovered inside the fetcher: the outcome is logged with
//! its cause and collapsed to an absent key in the result map. The taxonomy
//! exists for diagnostics (and so a future contract could surface reasons),
//! not for control flow.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The whole-retrieval timeout elapsed.
    #[error("retrieval timed out")]
    Timeout,
    /// The delivery endpoint returned a non-success status.
    #[error("HTTP status {0}")]
    Http(u16),
    /// The response completed but its body was empty.
    #[error("empty response body")]
    EmptyBody,
    /// The body is not a recognized image container.
    #[error("not a decodable image: {0}")]
    Decode(String),
    /// Connection/transport failure below the HTTP layer.
    #[error("transport error: {0}")]
    Request(String),
}

impl FetchError {
    /// Map a reqwest error to the taxonomy, pulling timeouts out of the
    /// generic transport bucket.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(e.to_string())
        }
    }
}
