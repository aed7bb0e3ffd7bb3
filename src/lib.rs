//! Round-robin reverse-proxy load balancer.
//!
//! Forwards every inbound HTTP request to exactly one backend from a fixed,
//! ordered list, rotating through the list one request at a time.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::BalancerConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
