//! Production backend: authenticated reqwest client for the delivery endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};
use url::Url;

use crate::config::DeliveryConfig;

use super::{AssetFetch, FetchError};

/// HTTP client for the asset delivery endpoint. Built once at process start
/// and shared (read-only) across all concurrent operations and batches; the
/// underlying reqwest client pools connections and follows redirects.
pub struct DeliveryClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl DeliveryClient {
    /// Construct the shared client. The optional session cookie is installed
    /// as a default header and marked sensitive so it never reaches logs.
    pub fn new(cfg: &DeliveryConfig, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &cfg.cookie {
            let mut value =
                HeaderValue::from_str(cookie).context("delivery cookie is not a valid header")?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(&cfg.user_agent)
            .default_headers(headers)
            .build()
            .context("building delivery HTTP client")?;

        let endpoint =
            Url::parse(&cfg.base_url).with_context(|| format!("bad base_url {}", cfg.base_url))?;

        Ok(Self {
            http,
            endpoint,
            timeout,
        })
    }
}

#[async_trait]
impl AssetFetch for DeliveryClient {
    async fn fetch(&self, asset_id: &str) -> Result<Bytes, FetchError> {
        // `.query()` percent-encodes the raw id, so arbitrary strings cannot
        // break the request line; bogus ids just 4xx at the endpoint.
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[("id", asset_id)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        resp.bytes().await.map_err(FetchError::from_transport)
    }
}
