//! HTTP transport: a thin warp wrapper around the core batch resolution.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use rezd_core::fetcher::{resolve_batch, AssetFetch};
use rezd_core::intake;
use rezd_core::types::ResultMap;

/// Shared server state: the long-lived delivery client plus batch limits,
/// constructed once at startup and injected into every request.
pub struct AppState {
    pub fetch: Arc<dyn AssetFetch>,
    pub max_in_flight: usize,
    pub batch_deadline: Option<Duration>,
}

/// `POST /get_resolutions` with body `{"asset_ids": [string, ...]}`.
/// Responds 200 with a map of asset id to `{"x", "y"}` for every resolved
/// asset (failed assets are simply absent), or 400 for a malformed body.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let state = warp::any().map(move || Arc::clone(&state));
    warp::post()
        .and(warp::path("get_resolutions"))
        .and(warp::path::end())
        .and(warp::body::bytes())
        .and(state)
        .and_then(get_resolutions)
}

async fn get_resolutions(
    body: Bytes,
    state: Arc<AppState>,
) -> Result<impl Reply, Infallible> {
    let batch = match intake::parse(&body) {
        Ok(batch) => batch,
        Err(e) => {
            tracing::debug!(cause = %e, "rejecting malformed request");
            let error = serde_json::json!({ "error": e.to_string() });
            return Ok(warp::reply::with_status(
                warp::reply::json(&error),
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    tracing::info!(count = batch.len(), "processing batch");
    // Run the batch as a detached task: if the client disconnects, hyper
    // drops this handler future, but dispatched fetches keep running to
    // completion. Only the await on the handle is cancelled.
    let handle = tokio::spawn(resolve_batch(
        Arc::clone(&state.fetch),
        batch,
        state.max_in_flight,
        state.batch_deadline,
    ));
    let map = match handle.await {
        Ok(map) => map,
        Err(e) => {
            tracing::error!("batch task join: {}", e);
            ResultMap::new()
        }
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&map),
        StatusCode::OK,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rezd_core::fetcher::FetchError;

    fn png_bytes(w: u32, h: u32) -> Bytes {
        let mut buf = Vec::new();
        let img = image::RgbaImage::new(w, h);
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        Bytes::from(buf)
    }

    /// Simulated delivery backend: A resolves, B 404s, C returns an empty body.
    struct FakeBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AssetFetch for FakeBackend {
        async fn fetch(&self, asset_id: &str) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match asset_id {
                "A" => Ok(png_bytes(200, 100)),
                "B" => Err(FetchError::Http(404)),
                "C" => Ok(Bytes::new()),
                _ => Err(FetchError::Http(400)),
            }
        }
    }

    fn test_state() -> (Arc<AppState>, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend {
            calls: AtomicUsize::new(0),
        });
        let state = Arc::new(AppState {
            fetch: backend.clone(),
            max_in_flight: 20,
            batch_deadline: None,
        });
        (state, backend)
    }

    #[tokio::test]
    async fn end_to_end_partial_batch() {
        let (state, backend) = test_state();
        let resp = warp::test::request()
            .method("POST")
            .path("/get_resolutions")
            .body(r#"{"asset_ids": ["A", "B", "C"]}"#)
            .reply(&routes(state))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body, serde_json::json!({"A": {"x": 200, "y": 100}}));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_batch_succeeds_without_backend_calls() {
        let (state, backend) = test_state();
        let resp = warp::test::request()
            .method("POST")
            .path("/get_resolutions")
            .body(r#"{"asset_ids": []}"#)
            .reply(&routes(state))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body, serde_json::json!({}));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_a_client_error() {
        let (state, backend) = test_state();
        let resp = warp::test::request()
            .method("POST")
            .path("/get_resolutions")
            .body(r#"{"ids": ["A"]}"#)
            .reply(&routes(state))
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert!(body["error"].as_str().unwrap().contains("asset_ids"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    /// Backend that records dispatch and completion of every fetch.
    struct TrackingBackend {
        started: AtomicUsize,
        completed: AtomicUsize,
    }

    #[async_trait]
    impl AssetFetch for TrackingBackend {
        async fn fetch(&self, _asset_id: &str) -> Result<Bytes, FetchError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(5)).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(png_bytes(1, 1))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn disconnected_client_does_not_cancel_dispatched_fetches() {
        let backend = Arc::new(TrackingBackend {
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });
        let state = Arc::new(AppState {
            fetch: backend.clone(),
            max_in_flight: 20,
            batch_deadline: None,
        });
        let filter = routes(state);

        let mut fut = Box::pin(
            warp::test::request()
                .method("POST")
                .path("/get_resolutions")
                .body(r#"{"asset_ids": ["a", "b"]}"#)
                .reply(&filter),
        );

        // Poll long enough for both fetches to dispatch, then drop the
        // request future the way a disconnecting client would.
        let _ = tokio::time::timeout(Duration::from_millis(100), fut.as_mut()).await;
        assert_eq!(backend.started.load(Ordering::SeqCst), 2);
        drop(fut);

        // The dispatched batch keeps running to completion regardless.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(backend.completed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_json_body_is_a_client_error() {
        let (state, _) = test_state();
        let resp = warp::test::request()
            .method("POST")
            .path("/get_resolutions")
            .body("definitely not json")
            .reply(&routes(state))
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
