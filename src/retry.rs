use log::warn;
use serde::{Deserialize, Serialize};

use std::time::{Duration, Instant};

use crate::audit::Cancellation;
use crate::error::FetchError;

const SLEEP_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: 1000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay)
    }
}

pub trait Sleep {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread, waking up early once the run is cancelled.
pub struct ThreadSleep {
    cancellation: Cancellation,
}

impl ThreadSleep {
    pub fn new(cancellation: Cancellation) -> Self {
        Self { cancellation }
    }
}

impl Sleep for ThreadSleep {
    fn sleep(&self, duration: Duration) {
        let deadline = Instant::now() + duration;

        while !self.cancellation.cancelled() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}

/// Exponential backoff around a single remote call. Only transient failures are retried, and
/// every one of them is followed by a backoff sleep, the last included.
pub struct Retry<'a> {
    policy: &'a RetryPolicy,
    sleeper: &'a dyn Sleep,
    cancellation: &'a Cancellation,
}

impl<'a> Retry<'a> {
    pub fn new(
        policy: &'a RetryPolicy,
        sleeper: &'a dyn Sleep,
        cancellation: &'a Cancellation,
    ) -> Self {
        Self {
            policy,
            sleeper,
            cancellation,
        }
    }

    pub fn attempt<T, F>(&self, label: &str, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Result<T, FetchError>,
    {
        let mut delay = self.policy.initial_delay();
        let mut attempt = 1;

        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) => {
                    if self.cancellation.cancelled() {
                        return Err(FetchError::Cancelled);
                    }

                    warn!(
                        "{} for {} (attempt {}/{}). Waiting {}ms...",
                        err,
                        label,
                        attempt,
                        self.policy.max_attempts,
                        delay.as_millis()
                    );

                    self.sleeper.sleep(delay);

                    if self.cancellation.cancelled() {
                        return Err(FetchError::Cancelled);
                    }

                    delay = delay.mul_f64(self.policy.backoff_multiplier);

                    if attempt >= self.policy.max_attempts {
                        return Err(FetchError::RetryExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }

                    attempt += 1;
                }
            }
        }
    }
}
