use std::time::Duration;

/// Exponential retry backoff with a capped ceiling.
///
/// Starts at a base delay, doubles on every connection failure up to the
/// cap, and resets to the base on the first success. The scheduling driver
/// consults [`Backoff::delay`] to decide when to attempt the next cycle.
#[derive(Debug)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
    last_error: Option<String>,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            current: base,
            last_error: None,
        }
    }

    /// Record a connection failure: double the delay (capped) and remember
    /// the error. Returns the new delay.
    pub fn on_failure(&mut self, error: impl Into<String>) -> Duration {
        self.last_error = Some(error.into());
        self.current = self.current.saturating_mul(2).min(self.max);
        self.current
    }

    /// Record a successful fetch: reset to the base delay.
    pub fn on_success(&mut self) {
        self.current = self.base;
        self.last_error = None;
    }

    /// The delay to wait before the next attempt.
    pub fn delay(&self) -> Duration {
        self.current
    }

    /// The most recent connection error, if the last cycle failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
