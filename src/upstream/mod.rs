//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → client.rs (build URL, attach request id, GET with timeout)
//!     → Upstream service
//!     → client.rs (status check, JSON decode)
//!     → Value or error.rs (UpstreamError) back to the handler
//! ```
//!
//! # Design Decisions
//! - Exactly one outbound call per inbound request; no retries
//! - One pooled client shared by all handlers
//! - Non-2xx upstream responses are failures

pub mod client;
pub mod error;

pub use client::{UpstreamClient, DATA_PATH, HEALTH_PATH};
pub use error::UpstreamError;
