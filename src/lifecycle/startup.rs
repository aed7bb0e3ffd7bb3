//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the server from a validated configuration
//! - Bind the listener and begin accepting traffic
//! - Serve until shutdown is triggered

use crate::config::{BalancerConfig, ConfigError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{self, ListenerError};

/// Error type for startup failures; all of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run the balancer until `shutdown` is triggered.
pub async fn run(config: BalancerConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let backends: Vec<&str> = config.backends.iter().map(|b| b.address.as_str()).collect();
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = ?backends,
        rate_limit = config.rate_limit.enabled,
        "Configuration loaded"
    );

    let server = HttpServer::new(config)?;
    let listener = net::bind(&server.config().listener).await?;
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
