//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (request ID, tracing, timeout, rate limit)
//! - Bind server to listener
//! - Dispatch each request to the next backend in rotation

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{validate_config, BalancerConfig, ConfigError};
use crate::http::forward::Forwarder;
use crate::lifecycle::ShutdownSignal;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::load_balancer::BackendPool;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<BackendPool>,
    pub forwarder: Forwarder,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: BalancerConfig,
    pool: Arc<BackendPool>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is validated first; nothing is bound yet.
    pub fn new(config: BalancerConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let pool = Arc::new(BackendPool::from_config(&config.backends)?);
        let forwarder = Forwarder::new(&config.timeouts, &config.forwarding);

        let state = AppState {
            pool: pool.clone(),
            forwarder,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            pool,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The overall request deadline answers 504 like an upstream timeout.
    fn build_router(config: &BalancerConfig, state: AppState) -> Router {
        let mut router = Router::new().fallback(proxy_handler).with_state(state);

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::GATEWAY_TIMEOUT,
                    Duration::from_secs(config.timeouts.request_secs),
                )),
        )
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.pool.len(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn pool(&self) -> &Arc<BackendPool> {
        &self.pool
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }
}

/// Catch-all proxy handler.
/// Picks the next backend in rotation and forwards the request to it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let Some((index, backend)) = state.pool.next() else {
        tracing::error!(request_id = %request_id, "No backends configured");
        return (StatusCode::SERVICE_UNAVAILABLE, "No backends configured").into_response();
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        backend = %backend,
        backend_index = index,
        "Proxying request"
    );

    match state.forwarder.forward(backend, client_ip, request).await {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                backend = %backend,
                status = response.status().as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request proxied"
            );
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                backend = %backend,
                backend_index = index,
                error = %e,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Upstream error"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    #[tokio::test]
    async fn server_started_after_trigger_stops_at_once() {
        let server = HttpServer::new(BalancerConfig::with_backends(["127.0.0.1:9"])).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let shutdown = crate::lifecycle::Shutdown::new();
        shutdown.trigger();

        let stopped =
            tokio::time::timeout(Duration::from_secs(2), server.run(listener, shutdown.subscribe()))
                .await
                .expect("server ignored an earlier shutdown");
        assert!(stopped.is_ok());
    }

    #[test]
    fn rejects_config_without_backends() {
        let result = HttpServer::new(BalancerConfig::default());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn unreachable_backend_yields_bad_gateway() {
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
            l.local_addr().unwrap().port()
        };
        let server =
            HttpServer::new(BalancerConfig::with_backends([format!("127.0.0.1:{}", port)])).unwrap();

        let response = server
            .router()
            .oneshot(Request::builder().uri("/anything").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(server.pool().len(), 1);
    }

    #[tokio::test]
    async fn rate_limited_requests_do_not_advance_cursor() {
        let mut config = BalancerConfig::with_backends(["127.0.0.1:1"]);
        config.timeouts.connect_secs = 1;
        config.rate_limit.enabled = true;
        config.rate_limit.max_requests = 1;
        config.rate_limit.window_secs = 60;
        let server = HttpServer::new(config).unwrap();

        let first = server
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_ne!(first.status(), StatusCode::TOO_MANY_REQUESTS);

        let second = server
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(server.pool().dispatched(), 1);
    }
}
