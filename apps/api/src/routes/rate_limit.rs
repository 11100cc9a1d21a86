//! Fixed-window per-IP rate limiting for the `/api` routes.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::AppState;

const WINDOW: Duration = Duration::from_secs(15 * 60);
const MAX_REQUESTS: u32 = 30;

struct Window {
    started: Instant,
    count: u32,
}

/// Per-IP fixed-window counter. Window bookkeeping lives behind one mutex;
/// generation requests are seconds long and rare, so contention is a
/// non-issue.
pub struct RateLimiter {
    windows: Mutex<HashMap<IpAddr, Window>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_limits(MAX_REQUESTS, WINDOW)
    }

    pub fn with_limits(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Records one request from `ip`; returns false once the window is full.
    /// Expired windows are swept on every call so the map only ever holds
    /// clients seen within the current window.
    pub fn try_acquire(&self, ip: IpAddr) -> bool {
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");
        let now = Instant::now();
        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let entry = windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.lock().expect("rate limiter lock poisoned").len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware applied to the `/api` router. Requests without peer info
/// (tests, unusual transports) share one bucket rather than bypassing the
/// limiter.
pub async fn rate_limit(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !state.rate_limiter.try_acquire(ip) {
        tracing::warn!(%ip, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "Too many requests. Try again in a few minutes."})),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn admits_up_to_the_limit_then_rejects() {
        let limiter = RateLimiter::with_limits(30, Duration::from_secs(900));
        for _ in 0..30 {
            assert!(limiter.try_acquire(ip(1)));
        }
        assert!(!limiter.try_acquire(ip(1)));
    }

    #[test]
    fn clients_get_independent_windows() {
        let limiter = RateLimiter::with_limits(1, Duration::from_secs(900));
        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(2)));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::with_limits(1, Duration::from_millis(0));
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
    }

    #[test]
    fn expired_windows_are_evicted_not_retained() {
        let limiter = RateLimiter::with_limits(1, Duration::from_millis(0));
        for a in 0..40u8 {
            for b in 0..250u8 {
                assert!(limiter.try_acquire(IpAddr::V4(Ipv4Addr::new(10, 0, a, b))));
            }
        }
        // Every window above expired immediately; only the last caller's
        // entry may remain.
        assert!(limiter.tracked_clients() <= 1);
    }

    #[test]
    fn live_windows_survive_the_sweep() {
        let limiter = RateLimiter::with_limits(5, Duration::from_secs(900));
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(2)));
        assert_eq!(limiter.tracked_clients(), 2);
    }
}
