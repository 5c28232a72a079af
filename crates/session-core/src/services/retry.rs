//! Fixed-backoff retry for store round trips

use std::future::Future;
use std::time::Duration;

use session_shared::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS};
use tracing::{error, warn};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Run `attempt` until it succeeds, fails with a non-transient error, or
    /// the attempt budget is spent. The final error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, action: &str, session_id: &str, mut attempt: F) -> Result<T, StoreError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut current = 1;
        loop {
            match attempt(current).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && current < self.max_attempts => {
                    warn!(
                        session_id,
                        attempt = current,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Session {} failed, retrying in {:?}",
                        action,
                        self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                    current += 1;
                }
                Err(e) => {
                    error!(
                        session_id,
                        attempt = current,
                        error = %e,
                        "Failed to {} session `{}`",
                        action,
                        session_id
                    );
                    return Err(e);
                }
            }
        }
    }
}
