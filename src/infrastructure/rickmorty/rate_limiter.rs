use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Token bucket rate limiter for upstream requests
///
/// Capacity equals the refill rate, so up to one second of requests may
/// burst before callers start waiting. The bucket always holds at least one
/// token so rates below one request per second still make progress.
#[derive(Clone)]
pub struct TokenBucketRateLimiter {
    /// Current number of available tokens
    tokens: Arc<Mutex<f64>>,
    /// Maximum token capacity
    capacity: f64,
    /// Tokens added per second
    refill_rate: f64,
    /// Last time tokens were refilled
    last_refill: Arc<Mutex<Instant>>,
}

impl TokenBucketRateLimiter {
    /// Create a limiter allowing `requests_per_second`.
    ///
    /// Non-positive or non-finite rates are clamped to a small positive rate;
    /// configuration validation rejects them before they get here.
    pub fn new(requests_per_second: f64) -> Self {
        let rate = if requests_per_second.is_finite() && requests_per_second > 0.0 {
            requests_per_second
        } else {
            0.1
        };

        let capacity = rate.max(1.0);

        Self {
            tokens: Arc::new(Mutex::new(capacity)),
            capacity,
            refill_rate: rate,
            last_refill: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Wait until a token is available and consume it
    pub async fn acquire(&self) {
        loop {
            let mut tokens = self.tokens.lock().await;
            let mut last_refill = self.last_refill.lock().await;

            let now = Instant::now();
            let elapsed = now.duration_since(*last_refill).as_secs_f64();
            let new_tokens = (*tokens + elapsed * self.refill_rate).min(self.capacity);

            if new_tokens >= 1.0 {
                *tokens = new_tokens - 1.0;
                *last_refill = now;
                break;
            }

            let tokens_needed = 1.0 - new_tokens;
            let wait = Duration::from_secs_f64((tokens_needed / self.refill_rate).max(0.01));

            // Release locks before sleeping
            drop(tokens);
            drop(last_refill);

            sleep(wait).await;
        }
    }

    /// Tokens available right now
    #[cfg(test)]
    pub async fn available_tokens(&self) -> f64 {
        let tokens = self.tokens.lock().await;
        let last_refill = self.last_refill.lock().await;

        let elapsed = Instant::now().duration_since(*last_refill).as_secs_f64();
        (*tokens + elapsed * self.refill_rate).min(self.capacity)
    }
}
