//! Backend pool management.
//!
//! # Responsibilities
//! - Hold the ordered, immutable backend list
//! - Apply the load balancing algorithm to select a backend

use std::sync::Arc;

use crate::config::BackendConfig;
use crate::load_balancer::{
    backend::{Backend, ParseBackendError},
    round_robin::RoundRobin,
    LoadBalancer,
};

/// The fixed set of upstreams and the strategy that rotates through them.
#[derive(Debug)]
pub struct BackendPool {
    backends: Arc<[Backend]>,
    balancer: Box<dyn LoadBalancer>,
}

impl BackendPool {
    /// Create a round-robin pool over already parsed backends.
    pub fn new(backends: Vec<Backend>) -> Self {
        Self::with_balancer(backends, Box::new(RoundRobin::new()))
    }

    pub fn with_balancer(backends: Vec<Backend>, balancer: Box<dyn LoadBalancer>) -> Self {
        Self {
            backends: backends.into(),
            balancer,
        }
    }

    /// Parse backend addresses from configuration, preserving order.
    pub fn from_config(configs: &[BackendConfig]) -> Result<Self, ParseBackendError> {
        let backends = configs
            .iter()
            .map(|c| c.address.parse::<Backend>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(backends))
    }

    /// Select the next backend, advancing the dispatch cursor.
    ///
    /// Returns the backend's position in configuration order alongside it.
    pub fn next(&self) -> Option<(usize, &Backend)> {
        let index = self.balancer.next_index(self.backends.len())?;
        self.backends.get(index).map(|b| (index, b))
    }

    /// Requests dispatched through this pool so far.
    pub fn dispatched(&self) -> usize {
        self.balancer.dispatched()
    }

    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
