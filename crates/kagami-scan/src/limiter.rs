//! Call spacing and concurrency toward one external service.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep_until, Instant};
use tracing::trace;

use crate::config::RateLimitConfig;

/// Grants permits in FIFO order, at most `max_concurrent` outstanding and
/// at least `interval` apart.
///
/// Both the semaphore and the spacing gate are fair tokio primitives, so
/// waiters are served in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    last_grant: Mutex<Option<Instant>>,
    interval: Duration,
    max_concurrent: usize,
}

/// Held while a call is in progress; dropping it frees the slot.
#[derive(Debug)]
pub struct RatePermit {
    _permit: OwnedSemaphorePermit,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let max_concurrent = config.max_concurrent.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            last_grant: Mutex::new(None),
            interval: config.interval,
            max_concurrent,
        }
    }

    /// Waits for a free slot, then for the spacing interval.
    pub async fn acquire(&self) -> RatePermit {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("rate limiter semaphore is never closed");

        let mut last = self.last_grant.lock().await;
        if let Some(previous) = *last {
            let next = previous + self.interval;
            if next > Instant::now() {
                trace!(wait = ?(next - Instant::now()), "rate limited");
                sleep_until(next).await;
            }
        }
        *last = Some(Instant::now());

        RatePermit { _permit: permit }
    }

    /// Slots not currently held.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
