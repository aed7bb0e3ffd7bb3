//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound upstream connection establishment (connector level)
//! - Bound the wait for the upstream response head
//! - Expire idle pooled upstream connections
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - A connect timeout surfaces as an unreachable upstream (502)
//! - A response timeout surfaces as 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use hyper_util::client::legacy::connect::HttpConnector;

use crate::config::TimeoutConfig;

/// Deadlines applied to every upstream exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub connect: Duration,
    pub response: Duration,
    pub idle: Duration,
}

impl UpstreamTimeouts {
    pub fn from_config(config: &TimeoutConfig) -> Self {
        Self {
            connect: Duration::from_secs(config.connect_secs),
            response: Duration::from_secs(config.upstream_secs),
            idle: Duration::from_secs(config.idle_secs),
        }
    }

    /// An HTTP connector that gives up after the connect deadline.
    pub fn connector(&self) -> HttpConnector {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(self.connect));
        connector.set_nodelay(true);
        connector
    }

    /// Await `fut` for at most the response deadline.
    ///
    /// Returns `None` if the deadline passed first; `fut` is dropped.
    pub async fn response<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::time::timeout(self.response, fut).await.ok()
    }
}

impl Default for UpstreamTimeouts {
    fn default() -> Self {
        Self::from_config(&TimeoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_seconds() {
        let config = TimeoutConfig {
            connect_secs: 2,
            upstream_secs: 7,
            request_secs: 9,
            idle_secs: 11,
        };
        let t = UpstreamTimeouts::from_config(&config);
        assert_eq!(t.connect, Duration::from_secs(2));
        assert_eq!(t.response, Duration::from_secs(7));
        assert_eq!(t.idle, Duration::from_secs(11));
    }

    #[tokio::test]
    async fn response_deadline_elapses() {
        let t = UpstreamTimeouts {
            response: Duration::from_millis(20),
            ..UpstreamTimeouts::default()
        };
        let slow = tokio::time::sleep(Duration::from_secs(5));
        assert!(t.response(slow).await.is_none());
        assert_eq!(t.response(async { 7 }).await, Some(7));
    }
}
