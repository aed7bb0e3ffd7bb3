//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (subscriber: env filter + pretty/JSON formatter)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line on the request path
//! - RUST_LOG overrides the configured level

pub mod logging;
