//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! BalancerConfig.listener
//!     → listener.rs (parse & bind)
//!     → Hand off to HTTP layer (one task per connection)
//! ```

pub mod listener;

pub use listener::{bind, ListenerError};
