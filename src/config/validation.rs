//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate backend addresses and the bind address
//! - Validate value ranges (timeouts > 0, limiter window > 0)
//! - The request deadline must outlast connect plus upstream wait
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::config::schema::BalancerConfig;
use crate::load_balancer::{Backend, ParseBackendError};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("at least one backend must be configured")]
    NoBackends,
    #[error("backend #{index}: {source}")]
    InvalidBackend {
        index: usize,
        source: ParseBackendError,
    },
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("timeouts.request_secs ({request}s) must cover connect_secs + upstream_secs ({required}s)")]
    RequestDeadlineTooShort { request: u64, required: u64 },
    #[error("rate_limit.{0} must be greater than zero when rate limiting is enabled")]
    ZeroRateLimit(&'static str),
    #[error("forwarding.upstream_header '{0}' is not a valid header name")]
    InvalidHeaderName(String),
    #[error("observability.log_format '{0}' must be 'pretty' or 'json'")]
    InvalidLogFormat(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }
    for (index, backend) in config.backends.iter().enumerate() {
        if let Err(source) = backend.address.parse::<Backend>() {
            errors.push(ValidationError::InvalidBackend { index, source });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("upstream_secs", timeouts.upstream_secs),
        ("request_secs", timeouts.request_secs),
        ("idle_secs", timeouts.idle_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }
    let required = timeouts.connect_secs.saturating_add(timeouts.upstream_secs);
    if timeouts.request_secs < required {
        errors.push(ValidationError::RequestDeadlineTooShort {
            request: timeouts.request_secs,
            required,
        });
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::ZeroRateLimit("max_requests"));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::ZeroRateLimit("window_secs"));
        }
    }

    if let Some(name) = &config.forwarding.upstream_header {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        }
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::InvalidLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
