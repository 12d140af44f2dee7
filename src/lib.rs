//! Frontend proxy library.
//!
//! Serves a small JSON API and relays two resources from a single
//! configured upstream service.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::{UpstreamClient, UpstreamError};
