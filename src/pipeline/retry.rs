//! Fixed-delay retry policy for network call sites

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How many times a call is attempted and how long to pause in between
///
/// The pause is fixed: it does not grow between attempts, and there is no
/// pause after the final attempt. Sleeping only suspends the calling task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(3))
    }
}

impl RetryPolicy {
    /// Creates a policy; at least one attempt is always made
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `op` until it succeeds or the attempts are exhausted
    ///
    /// Every error is treated as retryable.
    pub async fn run<T, E, F, Fut>(&self, label: &str, op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_if(label, op, |_| true).await
    }

    /// Runs `op` until it succeeds, the attempts are exhausted, or it fails
    /// with an error `retryable` rejects
    ///
    /// `op` receives the 1-based attempt number. The last error is returned
    /// on failure.
    pub async fn run_if<T, E, F, Fut, P>(&self, label: &str, mut op: F, retryable: P) -> Result<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !retryable(&e) {
                        tracing::debug!("{}: not retrying after error: {}", label, e);
                        return Err(e);
                    }

                    if attempt >= self.max_attempts {
                        tracing::warn!(
                            "{}: giving up after {} attempts: {}",
                            label,
                            attempt,
                            e
                        );
                        return Err(e);
                    }

                    tracing::warn!(
                        "{}: attempt {}/{} failed: {}",
                        label,
                        attempt,
                        self.max_attempts,
                        e
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
