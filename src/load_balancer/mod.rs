//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → pool.rs (fixed, ordered backend list)
//!     → round_robin.rs (advance cursor, pick index mod N)
//!     → backend.rs (authority the request is forwarded to)
//! ```
//!
//! # Design Decisions
//! - Backend list is immutable after startup
//! - The cursor is a lock-free atomic; concurrent requests never share an index
//! - No health tracking: a downed backend keeps its rotation share

pub mod backend;
pub mod pool;
pub mod round_robin;

pub use backend::{Backend, ParseBackendError};
pub use pool::BackendPool;
pub use round_robin::RoundRobin;

/// Selection strategy over a fixed list of backends.
///
/// Returns the index of the chosen backend, or `None` when `len` is zero.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    fn next_index(&self, len: usize) -> Option<usize>;

    /// Number of selections made so far.
    fn dispatched(&self) -> usize;
}
