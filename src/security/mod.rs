//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (optional process-wide sliding window)
//!     → headers.rs (strip hop-by-hop, rewrite Host, add X-Forwarded-*)
//!     → Forward to backend
//!
//! Backend response:
//!     → headers.rs (strip hop-by-hop)
//!     → Relay to client
//! ```
//!
//! # Design Decisions
//! - Rejected requests never reach dispatch, so they do not advance the cursor
//! - Existing X-Forwarded-For chains are extended, not replaced

pub mod headers;
pub mod rate_limit;
