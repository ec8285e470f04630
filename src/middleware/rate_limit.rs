//! Rate limiting middleware.
//!
//! In-memory fixed-window rate limiting per source IP. Two independently
//! owned limiter instances cover login attempts and general admin/API
//! traffic; each is injected into the router rather than living in a
//! process-wide singleton, so tests can construct isolated instances.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Configuration for one rate limiting policy.
#[derive(Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
    /// Un-count attempts whose response is 2xx.
    pub skip_successful: bool,
    /// Fixed message returned on rejection.
    pub message: &'static str,
}

impl RateLimitConfig {
    /// Login attempts: 5 per 15-minute window. Successes are counted too,
    /// so the sixth attempt in a window is rejected regardless of
    /// credential correctness.
    pub fn login() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(15 * 60),
            skip_successful: false,
            message: "Too many login attempts. Please try again later.",
        }
    }

    /// General admin/API traffic: 60 requests per 60-second window.
    pub fn api() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
            skip_successful: false,
            message: "Too many requests. Please slow down.",
        }
    }
}

/// Rate limiter state tracking request counts per IP.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Arc<Mutex<HashMap<IpAddr, WindowEntry>>>,
}

struct WindowEntry {
    count: u32,
    window_start: Instant,
}

enum Decision {
    Allowed,
    Limited { retry_after: Duration },
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Increment-and-check under one lock, so concurrent requests from the
    /// same address cannot slip past the threshold between a check and an
    /// increment.
    fn check(&self, ip: IpAddr) -> Decision {
        let mut state = self.state.lock();
        let now = Instant::now();

        let entry = state.entry(ip).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start) >= self.config.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.config.max_requests {
            return Decision::Limited {
                retry_after: (entry.window_start + self.config.window).duration_since(now),
            };
        }

        entry.count += 1;
        Decision::Allowed
    }

    /// Un-count one attempt (used when `skip_successful` is set).
    fn forgive(&self, ip: IpAddr) {
        if let Some(entry) = self.state.lock().get_mut(&ip) {
            entry.count = entry.count.saturating_sub(1);
        }
    }

    /// Evict stale window entries (call from a background task).
    pub fn cleanup(&self) {
        let mut state = self.state.lock();
        let now = Instant::now();
        let window = self.config.window;

        state.retain(|_, entry| now.duration_since(entry.window_start) < window * 2);
    }
}

/// Rate limiting middleware function.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let ip = addr.ip();

    match limiter.check(ip) {
        Decision::Limited { retry_after } => {
            warn!(
                ip = %ip,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );

            (
                StatusCode::TOO_MANY_REQUESTS,
                [(
                    header::RETRY_AFTER,
                    retry_after.as_secs().max(1).to_string(),
                )],
                Json(json!({ "error": limiter.config.message })),
            )
                .into_response()
        }
        Decision::Allowed => {
            let response = next.run(request).await;

            if limiter.config.skip_successful && response.status().is_success() {
                limiter.forgive(ip);
            }

            response
        }
    }
}
