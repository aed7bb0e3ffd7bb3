//! Round-robin load balancer binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                 LOAD BALANCER                 │
//!   Client Request     │  ┌────────┐   ┌─────────┐   ┌──────────────┐  │
//!   ───────────────────┼─▶│  net   │──▶│  http   │──▶│ load_balancer│  │
//!                      │  │listener│   │ server  │   │  round robin │  │
//!                      │  └────────┘   └─────────┘   └──────┬───────┘  │
//!                      │                                    ▼          │
//!   Client Response    │  ┌────────┐   ┌─────────┐   ┌──────────────┐  │
//!   ◀──────────────────┼──│response│◀──│ forward │◀──│   backend    │◀─┼── Backend
//!                      │  │ relay  │   │ client  │   │  i mod N     │  │
//!                      │  └────────┘   └─────────┘   └──────────────┘  │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use round_robin_lb::config::{
    loader::{resolve_config, CommandLine},
    BalancerConfig, ConfigError,
};
use round_robin_lb::lifecycle::{signals, startup, Shutdown};
use round_robin_lb::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "round-robin-lb")]
#[command(about = "Round-robin HTTP reverse proxy", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "LB_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides config and LB_BIND_ADDRESS).
    #[arg(short, long)]
    bind: Option<String>,

    /// Backend `host:port`; repeat or comma-separate for several.
    #[arg(long = "backend", value_name = "HOST:PORT")]
    backends: Vec<String>,
}

impl Cli {
    fn into_config(self) -> Result<BalancerConfig, ConfigError> {
        let flags = CommandLine {
            config: self.config,
            bind: self.bind,
            backends: self.backends,
        };
        resolve_config(&flags, |key| std::env::var(key).ok())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability)?;
    tracing::info!("round-robin-lb v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
