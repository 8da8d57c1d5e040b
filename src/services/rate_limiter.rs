use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep, Duration, Instant};

use crate::errors::FeedError;

/// Throttles requests to the upstream news feed.
///
/// Caps the number of in-flight feed requests and spaces request starts at
/// least `60s / requests_per_minute` apart, so a large batch cannot trip the
/// feed's abuse protection.
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    last_request: Mutex<Option<Instant>>,
    min_delay: Duration,
}

impl RateLimiter {
    /// # Arguments
    /// * `max_concurrent` - in-flight upstream requests allowed at once
    /// * `requests_per_minute` - upstream request budget, must be non-zero
    pub fn new(max_concurrent: usize, requests_per_minute: u32) -> Self {
        let min_delay_ms = 60_000 / u64::from(requests_per_minute.max(1));
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_request: Mutex::new(None),
            min_delay: Duration::from_millis(min_delay_ms),
        }
    }

    /// Waits for a free slot and for the spacing delay, then reserves the slot
    /// until the returned guard is dropped.
    pub async fn acquire(&self) -> Result<RateLimitGuard, FeedError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| FeedError::RateLimiter)?;

        // Reserve the next start slot under the lock, sleep outside it
        let wait = {
            let mut last = self.last_request.lock();
            let now = Instant::now();
            let start = match *last {
                Some(prev) if prev + self.min_delay > now => prev + self.min_delay,
                _ => now,
            };
            *last = Some(start);
            start - now
        };

        if !wait.is_zero() {
            sleep(wait).await;
        }

        Ok(RateLimitGuard { _permit: permit })
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Holds an upstream request slot; released on drop
pub struct RateLimitGuard {
    _permit: OwnedSemaphorePermit,
}
