//! Response payloads.
//!
//! Field names here are the public JSON contract of the proxy.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// Service name reported by this proxy.
pub const SERVICE_NAME: &str = "express-frontend";

/// `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn now() -> Self {
        Self {
            status: "healthy",
            service: SERVICE_NAME,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub backend_url: String,
}

impl ServiceInfo {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            message: "Express Frontend API",
            status: "running",
            version: env!("CARGO_PKG_VERSION"),
            backend_url: backend_url.into(),
        }
    }
}

/// Successful `GET /api/data`.
#[derive(Debug, Serialize)]
pub struct DataEnvelope {
    pub source: &'static str,
    pub backend_data: Value,
}

impl DataEnvelope {
    pub fn new(backend_data: Value) -> Self {
        Self {
            source: SERVICE_NAME,
            backend_data,
        }
    }
}

/// Failed `GET /api/data`.
#[derive(Debug, Serialize)]
pub struct DataFailure {
    pub error: &'static str,
    pub message: String,
}

impl DataFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: "Failed to fetch data from backend",
            message: message.into(),
        }
    }
}

/// `GET /api/backend-health`, both outcomes.
///
/// `backend` holds the upstream body when reachable and the string
/// `"unreachable"` otherwise; `error` is only present on failure.
#[derive(Debug, Serialize)]
pub struct BackendHealth {
    pub frontend: &'static str,
    pub backend: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendHealth {
    pub fn reachable(backend: Value) -> Self {
        Self {
            frontend: "healthy",
            backend,
            error: None,
        }
    }

    pub fn unreachable(error: impl Into<String>) -> Self {
        Self {
            frontend: "healthy",
            backend: Value::String("unreachable".to_string()),
            error: Some(error.into()),
        }
    }
}

/// Any unrouted request.
#[derive(Debug, Serialize)]
pub struct NotFound {
    pub error: &'static str,
    pub path: String,
}

impl NotFound {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            error: "Not Found",
            path: path.into(),
        }
    }
}
