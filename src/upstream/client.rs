//! HTTP client for the upstream service.
//!
//! # Responsibilities
//! - Build upstream URLs from the configured base
//! - Issue a single GET per call, no retries
//! - Bound each call with connect and overall timeouts
//! - Decode the body as JSON, falling back to a JSON string

use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;
use tokio::time;

use crate::config::TimeoutConfig;
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::upstream::error::{error_chain, UpstreamError};

/// Path of the upstream data resource.
pub const DATA_PATH: &str = "/api/data";
/// Path of the upstream health resource.
pub const HEALTH_PATH: &str = "/api/health";

/// Largest upstream body the proxy will buffer.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const USER_AGENT: &str = concat!("frontend-proxy/", env!("CARGO_PKG_VERSION"));

/// Shared client for the single configured upstream.
#[derive(Clone)]
pub struct UpstreamClient {
    base_url: String,
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client for `base_url`.
    pub fn new(base_url: &str, timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout: Duration::from_secs(timeouts.upstream_secs),
        }
    }

    /// Full URL for `path` on the upstream.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` from the upstream and return its JSON body.
    ///
    /// Any non-2xx status is a failure. The request id, when given, is
    /// forwarded as `x-request-id`.
    pub async fn get_json(
        &self,
        path: &str,
        request_id: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        let start = Instant::now();
        let url = self.url_for(path);

        let result = match time::timeout(self.timeout, self.fetch(&url, request_id)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout {
                url: url.clone(),
                timeout_ms: self.timeout.as_millis(),
            }),
        };

        match &result {
            Ok(_) => {
                tracing::debug!(url = %url, elapsed = ?start.elapsed(), "Upstream call succeeded");
                metrics::record_upstream_call(path, "ok", start);
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, kind = e.kind(), "Upstream call failed");
                metrics::record_upstream_call(path, e.kind(), start);
            }
        }

        result
    }

    async fn fetch(&self, url: &str, request_id: Option<&str>) -> Result<Value, UpstreamError> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, USER_AGENT);
        if let Some(id) = request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }

        let request = builder
            .body(Body::empty())
            .map_err(|e| UpstreamError::InvalidRequest {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| UpstreamError::Connect {
                url: url.to_string(),
                reason: error_chain(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_BODY_BYTES)
            .await
            .map_err(|e| UpstreamError::Body {
                url: url.to_string(),
                reason: error_chain(&e),
            })?;

        Ok(decode_body(&bytes))
    }
}

/// Decode an upstream body. Anything that is not JSON is relayed as a string.
fn decode_body(bytes: &Bytes) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
