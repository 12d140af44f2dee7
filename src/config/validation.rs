//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. All errors are
//! collected so a bad config file is reported in one pass.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("upstream.base_url '{url}' is not a valid URL: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("upstream.base_url '{url}' uses unsupported scheme '{scheme}' (only http is supported)")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.request_secs ({request_secs}) must exceed timeouts.upstream_secs ({upstream_secs})")]
    RequestTimeoutNotAboveUpstream { request_secs: u64, upstream_secs: u64 },

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("cors.allowed_origins entry '{0}' is not a valid header value")]
    InvalidCorsOrigin(String),
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    let base_url = &config.upstream.base_url;
    match Url::parse(base_url) {
        Ok(url) if url.scheme() != "http" => errors.push(ValidationError::UnsupportedScheme {
            url: base_url.clone(),
            scheme: url.scheme().to_string(),
        }),
        Ok(url) if url.host_str().is_none() => errors.push(ValidationError::InvalidBackendUrl {
            url: base_url.clone(),
            reason: "missing host".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBackendUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        }),
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("upstream_secs", timeouts.upstream_secs),
        ("request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }
    // request_secs must outlast the upstream call.
    if timeouts.upstream_secs > 0
        && timeouts.request_secs > 0
        && timeouts.request_secs <= timeouts.upstream_secs
    {
        errors.push(ValidationError::RequestTimeoutNotAboveUpstream {
            request_secs: timeouts.request_secs,
            upstream_secs: timeouts.upstream_secs,
        });
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    for origin in &config.cors.allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidCorsOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ProxyConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "not a url".into();
        config.timeouts.upstream_secs = 0;
        config.timeouts.request_secs = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::InvalidBackendUrl { .. }));
        assert!(errors.contains(&ValidationError::ZeroTimeout("upstream_secs")));
        assert!(errors.contains(&ValidationError::ZeroTimeout("request_secs")));
        assert!(errors.contains(&ValidationError::InvalidMetricsAddress("localhost".into())));
    }

    #[test]
    fn test_request_timeout_must_outlast_upstream_call() {
        let mut config = ProxyConfig::default();
        config.timeouts.upstream_secs = 5;
        config.timeouts.request_secs = 1;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::RequestTimeoutNotAboveUpstream {
                request_secs: 1,
                upstream_secs: 5,
            }])
        );

        config.timeouts.request_secs = 5;
        assert!(validate_config(&config).is_err());

        config.timeouts.request_secs = 6;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_rejects_non_http_upstream() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "ftp://files.example.com".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnsupportedScheme {
                url: "ftp://files.example.com".into(),
                scheme: "ftp".into(),
            }]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "nonsense".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_bad_cors_origin() {
        let mut config = ProxyConfig::default();
        config.cors.allowed_origins = vec!["http://ok.example".into(), "bad\norigin".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidCorsOrigin("bad\norigin".into())]);
    }
}
