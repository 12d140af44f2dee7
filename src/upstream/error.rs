//! Upstream call failures.

use thiserror::Error;

/// Why a call to the upstream failed.
///
/// Handlers only surface the `Display` text; the variants exist for logs
/// and metrics.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    #[error("connect to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    #[error("timeout of {timeout_ms}ms exceeded calling {url}")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("Request failed with status code {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

impl UpstreamError {
    /// URL of the failed call.
    pub fn url(&self) -> &str {
        match self {
            UpstreamError::InvalidRequest { url, .. }
            | UpstreamError::Connect { url, .. }
            | UpstreamError::Timeout { url, .. }
            | UpstreamError::Status { url, .. }
            | UpstreamError::Body { url, .. } => url,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::InvalidRequest { .. } => "invalid_request",
            UpstreamError::Connect { .. } => "connect",
            UpstreamError::Timeout { .. } => "timeout",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Body { .. } => "body",
        }
    }
}

/// Render an error and its sources as `outer: inner: root`.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("client error (Connect)")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_error_chain_includes_sources() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        ));
        assert_eq!(error_chain(&err), "client error (Connect): Connection refused");
    }

    #[test]
    fn test_status_message() {
        let err = UpstreamError::Status {
            url: "http://localhost:5000/api/data".into(),
            status: 502,
        };
        assert_eq!(err.to_string(), "Request failed with status code 502");
        assert_eq!(err.kind(), "status");
        assert_eq!(err.url(), "http://localhost:5000/api/data");
    }
}
