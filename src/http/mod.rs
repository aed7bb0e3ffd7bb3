//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID, retarget URI at backend)
//!     → [load balancer picks the next backend]
//!     → forward.rs (pooled HTTP/1.1 client, timeouts, error mapping)
//!     → response.rs (strip hop-by-hop, relay)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::Forwarder;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
