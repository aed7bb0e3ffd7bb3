//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (connect deadline on the connector)
//!     → timeouts.rs (deadline on the upstream response head)
//!     → On failure: error mapped to 502/504, no retry
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline
//! - No retries, circuit breaking or quarantine: each request commits to the
//!   backend chosen at dispatch

pub mod timeouts;

pub use timeouts::UpstreamTimeouts;
