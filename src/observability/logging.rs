//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick the level from RUST_LOG or configuration
//! - Emit pretty output for development, JSON for production

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default directives when RUST_LOG is unset.
pub fn default_directives(config: &ObservabilityConfig) -> String {
    format!(
        "round_robin_lb={level},tower_http={level}",
        level = config.log_level
    )
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_use_configured_level() {
        let config = ObservabilityConfig {
            log_level: "debug".into(),
            log_format: "pretty".into(),
        };
        assert_eq!(
            default_directives(&config),
            "round_robin_lb=debug,tower_http=debug"
        );
    }

    #[test]
    fn installs_pretty_subscriber_once() {
        let config = ObservabilityConfig {
            log_level: "info".into(),
            log_format: "pretty".into(),
        };
        assert!(init(&config).is_ok());
        assert!(init(&config).is_err());
    }
}
