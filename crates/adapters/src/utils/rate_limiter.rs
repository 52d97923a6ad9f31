//! Token bucket rate limiter for REST requests
//!
//! Exchange descriptors publish their limit as a minimum spacing between
//! requests; [`RateLimiterConfig::from_interval`] turns that into a bucket
//! holding one token per window.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for rate limiting behavior
#[derive(Clone, Debug)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per window
    pub requests_per_window: u32,

    /// Time window in milliseconds
    pub window_ms: u64,

    /// Whether to wait when limit is reached or return immediately
    pub block_on_limit: bool,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 20,
            window_ms: 1000,
            block_on_limit: true,
        }
    }
}

impl RateLimiterConfig {
    /// One request every `interval_ms` milliseconds
    pub fn from_interval(interval_ms: u64) -> Self {
        Self {
            requests_per_window: 1,
            window_ms: interval_ms.max(1),
            block_on_limit: true,
        }
    }
}

struct RateLimiterState {
    tokens: u32,
    max_tokens: u32,
    last_refill: Instant,
    /// Tokens per millisecond
    refill_rate: f64,
    config: RateLimiterConfig,
}

impl RateLimiterState {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.last_refill).as_millis() as f64;
        let tokens_to_add = (elapsed_ms * self.refill_rate) as u32;

        if tokens_to_add > 0 {
            self.tokens = (self.tokens + tokens_to_add).min(self.max_tokens);
            self.last_refill = now;
        }
    }
}

/// Token bucket rate limiter shared by clones
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimiterState>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        let refill_rate = config.requests_per_window as f64 / config.window_ms as f64;

        let state = RateLimiterState {
            tokens: config.requests_per_window,
            max_tokens: config.requests_per_window,
            last_refill: Instant::now(),
            refill_rate,
            config,
        };

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Acquires a token for making a request
    ///
    /// Waits for the next token when blocking is enabled. Returns false if the
    /// bucket is empty and blocking is disabled.
    pub async fn acquire(&self) -> bool {
        loop {
            let mut state = self.state.lock().await;
            state.refill();

            if state.tokens > 0 {
                state.tokens -= 1;
                debug!("Rate limiter token acquired - {} tokens remaining", state.tokens);
                return true;
            }

            if !state.config.block_on_limit {
                warn!("Rate limit reached - request rejected");
                return false;
            }

            let wait_ms = (1.0 / state.refill_rate).ceil() as u64;
            drop(state);

            debug!("Rate limit reached - waiting {}ms for next token", wait_ms);
            sleep(Duration::from_millis(wait_ms)).await;
        }
    }
}
