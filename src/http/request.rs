//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) when the caller sent none
//! - Propagate the ID to the backend and back to the caller
//! - Prepare the inbound request for forwarding to a backend
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Path and query are forwarded verbatim; only scheme and authority change

use axum::body::Body;
use axum::http::{
    uri::{PathAndQuery, Scheme},
    HeaderName, Request, Uri, Version,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::load_balancer::Backend;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer that assigns an `x-request-id` to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Read the request ID, or "unknown" if none was assigned.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Absolute URI for `uri`'s path and query on `backend`.
pub fn upstream_uri(uri: &Uri, backend: &Backend) -> Result<Uri, axum::http::Error> {
    let path_and_query = uri
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(backend.authority().clone())
        .path_and_query(path_and_query)
        .build()
}

/// Retarget `request` at `backend`. Headers are left to the caller.
pub fn retarget(request: &mut Request<Body>, backend: &Backend) -> Result<(), axum::http::Error> {
    *request.uri_mut() = upstream_uri(request.uri(), backend)?;
    // Outbound connections speak HTTP/1.1 regardless of the inbound version.
    *request.version_mut() = Version::HTTP_11;
    Ok(())
}
