//! Request pacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Single-tier rate limiter.
///
/// TMDB enforces roughly 40 requests per second. A browse screen fires one
/// request per row at once, so consecutive requests are spaced by at least
/// `min_interval`.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Last request timestamp.
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits until the next request is allowed.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval.saturating_sub(elapsed)).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}
