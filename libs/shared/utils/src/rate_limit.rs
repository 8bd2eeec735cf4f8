use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tracing::debug;

use shared_models::error::AppError;

/// Fixed-window request counter keyed by client address, shared across
/// concurrently executing requests.
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    counters: DashMap<IpAddr, (Instant, u32)>,
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            counters: DashMap::new(),
        }
    }

    pub fn per_minute(max_per_window: u32) -> Self {
        Self::new(max_per_window, Duration::from_secs(60))
    }

    pub fn try_acquire(&self, key: IpAddr) -> bool {
        let now = Instant::now();
        let mut entry = self.counters.entry(key).or_insert((now, 0));
        let (window_start, count) = *entry.value();

        if now.duration_since(window_start) >= self.window {
            *entry.value_mut() = (now, 1);
            true
        } else if count < self.max_per_window {
            entry.value_mut().1 = count + 1;
            true
        } else {
            false
        }
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    if let Some(ip) = client_ip {
        if !limiter.try_acquire(ip) {
            debug!("Rate limit exceeded for {}", ip);
            return Err(AppError::TooManyRequests);
        }
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_budget() {
        let limiter = RateLimiter::per_minute(3);
        for _ in 0..3 {
            assert!(limiter.try_acquire(ip(1)));
        }
        assert!(!limiter.try_acquire(ip(1)));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::per_minute(1);
        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(2)));
    }

    #[test]
    fn window_rollover_resets_budget() {
        let limiter = RateLimiter::new(1, Duration::from_millis(0));
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
    }
}
