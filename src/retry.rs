// src/retry.rs
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::config::consts::{BACKOFF_BASE_SECS, BACKOFF_JITTER_SECS, BACKOFF_STEP_SECS, MAX_ATTEMPTS};
use crate::error::{Error, Result, SourceError};

/// Where the single worker waits: between failed attempts and between games.
/// Production code blocks the thread; tests record the requested durations.
pub trait Pause {
    fn pause(&self, d: Duration);
}

pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, d: Duration) {
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}

/// Bounded retry with linearly growing, jittered backoff.
///
/// Delay after failed attempt `a` (0-based) is `base + a * step + U[0, jitter)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub step: Duration,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base: Duration::from_secs_f64(BACKOFF_BASE_SECS),
            step: Duration::from_secs_f64(BACKOFF_STEP_SECS),
            jitter: Duration::from_secs_f64(BACKOFF_JITTER_SECS),
        }
    }
}

impl RetryPolicy {
    /// Same attempt bound, no waiting. For tests and dry runs.
    pub fn immediate(max_attempts: u32) -> Self {
        Self { max_attempts, base: Duration::ZERO, step: Duration::ZERO, jitter: Duration::ZERO }
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        let jitter = if self.jitter.is_zero() {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(rand::rng().random_range(0.0..self.jitter.as_secs_f64()))
        };
        self.base + self.step * attempt + jitter
    }

    /// Run `op` until it succeeds or the attempt bound is hit.
    ///
    /// Returns the first success without further attempts. After the last
    /// failure there is no extra wait; the error comes back as
    /// [`Error::ExhaustedRetries`] carrying the final source error.
    pub fn call<T, F>(&self, label: &str, pause: &dyn Pause, mut op: F) -> Result<T>
    where
        F: FnMut() -> std::result::Result<T, SourceError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match op() {
                Ok(v) => {
                    if attempt > 0 {
                        logd!("{label}: succeeded on attempt {}", attempt + 1);
                    }
                    return Ok(v);
                }
                Err(e) if attempt + 1 >= attempts => {
                    loge!("{label}: attempt {}/{attempts} failed: {e}; giving up", attempt + 1);
                    return Err(Error::ExhaustedRetries { label: label.to_string(), attempts, last: e });
                }
                Err(e) => {
                    let wait = self.backoff(attempt);
                    logw!(
                        "{label}: attempt {}/{attempts} failed: {e}; retrying in {:.1}s",
                        attempt + 1,
                        wait.as_secs_f64()
                    );
                    pause.pause(wait);
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_with_attempt() {
        let p = RetryPolicy { jitter: Duration::ZERO, ..RetryPolicy::default() };
        assert_eq!(p.backoff(0), Duration::from_secs(2));
        assert_eq!(p.backoff(1), Duration::from_secs(4));
        assert_eq!(p.backoff(4), Duration::from_secs(10));
    }

    #[test]
    fn jitter_stays_below_bound() {
        let p = RetryPolicy::default();
        for a in 0..5 {
            let d = p.backoff(a);
            let floor = p.base + p.step * a;
            assert!(d >= floor && d < floor + p.jitter);
        }
    }
}
