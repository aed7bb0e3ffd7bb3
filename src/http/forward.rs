//! Upstream forwarding.
//!
//! Sends one inbound request to one backend over a pooled HTTP/1.1 client
//! and converts the outcome into either the relayed response or a
//! [`ProxyError`]. No retries: the backend chosen at dispatch is final.

use std::error::Error as StdError;
use std::net::IpAddr;

use axum::body::Body;
use axum::http::{HeaderName, Request, Response};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::{ForwardingConfig, TimeoutConfig};
use crate::error::ProxyError;
use crate::http::request::retarget;
use crate::http::response::relay;
use crate::load_balancer::Backend;
use crate::resilience::timeouts::UpstreamTimeouts;
use crate::security::headers::{add_forwarded_headers, rewrite_host, strip_hop_by_hop};

/// Pooled client used for all upstream traffic.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Forwards requests to a chosen backend. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Forwarder {
    client: UpstreamClient,
    timeouts: UpstreamTimeouts,
    add_forwarded_headers: bool,
    upstream_header: Option<HeaderName>,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig, forwarding: &ForwardingConfig) -> Self {
        let timeouts = UpstreamTimeouts::from_config(timeouts);
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(timeouts.idle)
            .pool_timer(TokioTimer::new())
            .build(timeouts.connector());

        let upstream_header = forwarding.upstream_header.as_deref().and_then(|name| {
            match HeaderName::from_bytes(name.as_bytes()) {
                Ok(header) => Some(header),
                Err(_) => {
                    tracing::warn!(header = %name, "Ignoring invalid upstream header name");
                    None
                }
            }
        });

        Self {
            client,
            timeouts,
            add_forwarded_headers: forwarding.add_forwarded_headers,
            upstream_header,
        }
    }

    /// Forward `request` to `backend` and relay its response.
    ///
    /// `client_ip` feeds the X-Forwarded-For chain when known.
    pub async fn forward(
        &self,
        backend: &Backend,
        client_ip: Option<IpAddr>,
        mut request: Request<Body>,
    ) -> Result<Response<Body>, ProxyError> {
        let headers = request.headers_mut();
        strip_hop_by_hop(headers);
        if self.add_forwarded_headers {
            if let Some(ip) = client_ip {
                add_forwarded_headers(headers, ip);
            }
        }
        rewrite_host(headers, backend.authority());

        retarget(&mut request, backend).map_err(|e| {
            ProxyError::InvalidUpstreamRequest {
                backend: backend.to_string(),
                reason: e.to_string(),
            }
        })?;

        let upstream = match self.timeouts.response(self.client.request(request)).await {
            Some(Ok(upstream)) => upstream,
            Some(Err(e)) => return Err(classify(backend, &e)),
            None => {
                return Err(ProxyError::UpstreamTimeout {
                    backend: backend.to_string(),
                    secs: self.timeouts.response.as_secs(),
                })
            }
        };

        Ok(relay(
            upstream.map(Body::new),
            backend,
            self.upstream_header.as_ref(),
        ))
    }
}

/// Connect failures mean the backend is unreachable; anything after the
/// connection was established is a broken exchange.
fn classify(backend: &Backend, err: &hyper_util::client::legacy::Error) -> ProxyError {
    let reason = describe(err);
    if err.is_connect() {
        ProxyError::UpstreamUnavailable {
            backend: backend.to_string(),
            reason,
        }
    } else {
        ProxyError::MalformedUpstreamResponse {
            backend: backend.to_string(),
            reason,
        }
    }
}

/// Flatten an error and its sources into one line.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
