//! Request-path errors and their mapping to gateway responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Why a proxied exchange failed.
///
/// Every variant is local to one request; none of them affect the dispatch
/// cursor or other in-flight requests.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Connection refused, DNS failure or connect timeout.
    #[error("upstream {backend} unavailable: {reason}")]
    UpstreamUnavailable { backend: String, reason: String },

    /// The upstream accepted the connection but sent no response in time.
    #[error("upstream {backend} timed out after {secs}s")]
    UpstreamTimeout { backend: String, secs: u64 },

    /// The upstream violated the protocol or dropped the exchange.
    #[error("malformed response from upstream {backend}: {reason}")]
    MalformedUpstreamResponse { backend: String, reason: String },

    /// The upstream request could not be constructed.
    #[error("could not build request for upstream {backend}: {reason}")]
    InvalidUpstreamRequest { backend: String, reason: String },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::UpstreamUnavailable { .. }
            | ProxyError::MalformedUpstreamResponse { .. }
            | ProxyError::InvalidUpstreamRequest { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Caller-facing message. Internal details stay in the logs.
    fn public_message(&self) -> &'static str {
        match self {
            ProxyError::UpstreamUnavailable { .. } => "Upstream unavailable",
            ProxyError::UpstreamTimeout { .. } => "Upstream timed out",
            ProxyError::MalformedUpstreamResponse { .. } => "Invalid upstream response",
            ProxyError::InvalidUpstreamRequest { .. } => "Upstream request failed",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
