//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{BackendConfig, BalancerConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::load_balancer::ParseBackendError;

/// Replaces `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "LB_BIND_ADDRESS";
/// Comma-separated `host:port` list replacing `backends`.
pub const ENV_BACKENDS: &str = "LB_BACKENDS";
/// Requests allowed per window; enables the rate limiter.
pub const ENV_MAX_REQUESTS: &str = "MAX_REQUESTS_PER_TIME";
/// Window length in seconds; enables the rate limiter.
pub const ENV_RATE_WINDOW: &str = "RATE_LIMIT_TIME";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Backend(#[from] ParseBackendError),
    #[error("invalid value '{value}' for {key}")]
    Env { key: &'static str, value: String },
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration file without validating it.
pub fn read_config(path: &Path) -> Result<BalancerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BalancerConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides on top of `config`.
///
/// `lookup` returns the value of a variable, if set. Pass
/// `|key| std::env::var(key).ok()` for the process environment.
pub fn apply_env_overrides<F>(config: &mut BalancerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }

    if let Some(list) = lookup(ENV_BACKENDS) {
        config.backends = parse_backend_list(&list);
    }

    if let Some(value) = lookup(ENV_MAX_REQUESTS) {
        config.rate_limit.max_requests = value.trim().parse().map_err(|_| ConfigError::Env {
            key: ENV_MAX_REQUESTS,
            value: value.clone(),
        })?;
        config.rate_limit.enabled = true;
    }

    if let Some(value) = lookup(ENV_RATE_WINDOW) {
        config.rate_limit.window_secs = value.trim().parse().map_err(|_| ConfigError::Env {
            key: ENV_RATE_WINDOW,
            value: value.clone(),
        })?;
        config.rate_limit.enabled = true;
    }

    Ok(())
}

/// Settings given as command line flags.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    pub config: Option<PathBuf>,
    pub bind: Option<String>,
    /// `--backend` values; each may itself be a comma-separated list.
    pub backends: Vec<String>,
}

/// Build the effective configuration.
///
/// Precedence, lowest first: defaults, the config file, the environment,
/// then command line flags. The result is validated.
pub fn resolve_config<F>(cli: &CommandLine, lookup: F) -> Result<BalancerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => BalancerConfig::default(),
    };
    apply_env_overrides(&mut config, lookup)?;

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    if !cli.backends.is_empty() {
        config.backends = parse_backend_list(&cli.backends.join(","));
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Split a comma-separated address list, skipping blank entries.
pub fn parse_backend_list(list: &str) -> Vec<BackendConfig> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|address| BackendConfig { address: address.to_string() })
        .collect()
}
