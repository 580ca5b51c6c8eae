//! Request spacing
//!
//! The service answers HTTP 503 ("please wait a short while before issuing the
//! next request") when calls arrive back to back, so every request issued
//! through one client first waits here.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum interval between consecutive requests
#[derive(Debug, Clone)]
pub struct RequestThrottle {
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RequestThrottle {
    /// Create a throttle; a zero interval disables waiting
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next request may be sent, then record it
    pub async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        // Holding the lock across the sleep queues concurrent callers
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let delay = self.min_interval - elapsed;
                debug!("Waiting {:?} before next request", delay);
                sleep(delay).await;
            }
        }
        *last = Some(Instant::now());
    }
}
