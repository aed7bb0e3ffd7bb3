//! Process-wide sliding-window rate limiting.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::RateLimitConfig;

/// Admits at most `max_requests` within any `window`.
///
/// Keeps one timestamp per admitted request; entries older than the window
/// are discarded on each check.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests as usize,
            window,
            admitted: Mutex::new(VecDeque::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Try to admit a request now.
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Try to admit a request arriving at `now`.
    pub fn try_acquire_at(&self, now: Instant) -> bool {
        let mut admitted = self.admitted.lock().unwrap_or_else(PoisonError::into_inner);

        while let Some(&oldest) = admitted.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                admitted.pop_front();
            } else {
                break;
            }
        }

        if admitted.len() >= self.max_requests {
            return false;
        }
        admitted.push_back(now);
        true
    }
}

/// Body of a 429 answer.
#[derive(Debug, Serialize)]
struct RateLimited {
    error: &'static str,
}

const RATE_LIMITED_MESSAGE: &str = "Too many requests, try again later";

/// Middleware rejecting requests once the window is full.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if limiter.try_acquire() {
        next.run(request).await
    } else {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rate limit exceeded"
        );
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RateLimited { error: RATE_LIMITED_MESSAGE }),
        )
            .into_response()
    }
}
