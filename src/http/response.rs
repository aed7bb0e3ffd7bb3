//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the backend response to the client
//! - Strip hop-by-hop headers
//! - Optionally name the serving backend in a response header
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Status, end-to-end headers and body bytes are relayed unchanged

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Response};

use crate::load_balancer::Backend;
use crate::security::headers::strip_hop_by_hop;

/// Convert an upstream response into the one sent to the caller.
pub fn relay(
    response: Response<Body>,
    backend: &Backend,
    upstream_header: Option<&HeaderName>,
) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);

    if let Some(name) = upstream_header {
        if let Ok(value) = HeaderValue::from_str(&backend.to_string()) {
            parts.headers.insert(name.clone(), value);
        }
    }

    Response::from_parts(parts, body)
}
