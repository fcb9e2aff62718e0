//! Fixed-window request limiting per client
//!
//! Clients are keyed by the first `X-Forwarded-For` entry, else the peer
//! address. Keys live in a bounded LRU so a flood of distinct clients cannot
//! grow memory without limit.

use super::state::AppState;
use crate::config::RateLimitConfig;
use crate::error::ApiError;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use lru::LruCache;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<LruCache<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_tracked_clients).unwrap_or(NonZeroUsize::MIN);
        Self {
            max_requests: config.max_requests,
            window: config.window,
            clients: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Count a request from `key` at `now`
    pub fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut clients = match self.clients.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let window = match clients.get_mut(key) {
            Some(w) if now.duration_since(w.started) < self.window => w,
            _ => {
                clients.put(
                    key.to_string(),
                    Window {
                        started: now,
                        count: 0,
                    },
                );
                match clients.get_mut(key) {
                    Some(w) => w,
                    None => return Decision::Allowed { remaining: 0 },
                }
            }
        };
        if window.count >= self.max_requests {
            let elapsed = now.duration_since(window.started);
            return Decision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }
        window.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - window.count,
        }
    }

    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }
}

/// Identify the caller of `request`
pub fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "local".to_string())
}

/// Middleware rejecting clients over their budget with 429
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = client_key(&request);
    match state.limiter.check(&key) {
        Decision::Allowed { .. } => next.run(request).await,
        Decision::Limited { retry_after } => {
            warn!(client = %key, "Rate limit exceeded");
            let mut response = ApiError::RateLimited.into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_after.as_secs().max(1).to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
    }
}
