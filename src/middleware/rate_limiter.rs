//! Rate limiting middleware
//!
//! Fixed-window counters per client IP. Coarser than a token bucket but
//! cheap, and plenty for an API whose hot paths are dashboard reads.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Rate limiter state shared across requests
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<RwLock<HashMap<String, Window>>>,
    max_per_window: u32,
}

impl RateLimiter {
    /// Create a new rate limiter allowing `requests_per_second` per client
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            max_per_window: requests_per_second,
        }
    }

    /// Record a hit for `key`; false means over the limit for this window
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.write().await;

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= WINDOW {
            window.started = now;
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.max_per_window
    }

    /// Drop windows idle longer than `max_age`
    pub async fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        windows.retain(|_, w| now.duration_since(w.started) < max_age);
    }
}

/// Create rate limiting middleware layer
pub fn rate_limit_layer(
    rate_limiter: RateLimiter,
) -> impl Fn(
    Request<Body>,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone
       + Send {
    move |request: Request<Body>, next: Next| {
        let rate_limiter = rate_limiter.clone();
        Box::pin(async move {
            let client_key = extract_client_ip(&request);

            if !rate_limiter.check(&client_key).await {
                tracing::warn!(client = %client_key, "Rate limit exceeded");
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, "1")],
                    "Too many requests. Please try again later.",
                )
                    .into_response();
            }

            next.run(request).await
        })
    }
}

/// Best-effort client IP from proxy headers
fn extract_client_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_within_window() {
        let limiter = RateLimiter::new(3);

        assert!(limiter.check("client").await);
        assert!(limiter.check("client").await);
        assert!(limiter.check("client").await);
        assert!(!limiter.check("client").await);
    }

    #[tokio::test]
    async fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1);

        assert!(limiter.check("a").await);
        assert!(limiter.check("b").await);
        assert!(!limiter.check("a").await);
    }

    #[tokio::test]
    async fn test_cleanup_retains_recent() {
        let limiter = RateLimiter::new(1);
        limiter.check("client").await;

        limiter.cleanup(Duration::from_secs(60)).await;
        assert_eq!(limiter.windows.read().await.len(), 1);

        limiter.cleanup(Duration::from_nanos(0)).await;
        assert_eq!(limiter.windows.read().await.len(), 0);
    }
}
