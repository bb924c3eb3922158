//! Generic retry driver with capped exponential backoff.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use crate::{timer::sleep, DocQaError, Result};

/// Metadata handed to a [`RetryObserver`] before each retry sleep.
#[derive(Debug)]
pub struct RetryAttempt<'a> {
    /// 1-based number of the retry about to happen.
    pub attempt: usize,
    /// Delay that will be slept before the retry.
    pub delay: Duration,
    /// Failure of the attempt that just completed.
    pub error: &'a (dyn std::error::Error + 'static),
}

/// Side-effect-only callback invoked once per failed attempt that is retried.
///
/// Its `()` return leaves the executor's control flow untouched. It should not
/// panic; a panic unwinds through the caller like any other.
pub type RetryObserver = Arc<dyn Fn(&RetryAttempt<'_>) + Send + Sync>;

/// How often and how patiently an operation is retried.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    initial_delay: Duration,
    max_delay: Duration,
    exponential_base: f64,
    on_retry: Option<RetryObserver>,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("initial_delay", &self.initial_delay)
            .field("max_delay", &self.max_delay)
            .field("exponential_base", &self.exponential_base)
            .field("on_retry", &self.on_retry.as_ref().map(|_| "<observer>"))
            .finish()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(60_000),
            exponential_base: 2.0,
            on_retry: None,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self::default().with_max_retries(0)
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the growth factor between delays.
    ///
    /// Fails with [`DocQaError::InvalidConfig`] unless `base` is finite and
    /// greater than 1.
    pub fn with_exponential_base(mut self, base: f64) -> Result<Self> {
        if !base.is_finite() || base <= 1.0 {
            return Err(DocQaError::InvalidConfig(format!(
                "exponential base must be a finite number greater than 1, got {base}"
            )));
        }
        self.exponential_base = base;
        Ok(self)
    }

    /// Installs an observer called before every retry sleep.
    pub fn with_on_retry<F>(mut self, observer: F) -> Self
    where
        F: Fn(&RetryAttempt<'_>) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(observer));
        self
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn exponential_base(&self) -> f64 {
        self.exponential_base
    }

    /// Delay slept before retry number `attempt + 1`:
    /// `min(initial_delay * base^attempt, max_delay)`.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let mut delay = self.first_delay();
        for _ in 0..attempt {
            if delay >= self.max_delay {
                break;
            }
            delay = self.next_delay(delay);
        }
        delay
    }

    fn first_delay(&self) -> Duration {
        self.initial_delay.min(self.max_delay)
    }

    fn next_delay(&self, current: Duration) -> Duration {
        let scaled_nanos = (current.as_nanos() as f64 * self.exponential_base).round();
        if scaled_nanos >= self.max_delay.as_nanos() as f64 {
            return self.max_delay;
        }
        if scaled_nanos < u64::MAX as f64 {
            return Duration::from_nanos(scaled_nanos as u64);
        }
        // Beyond u64 nanoseconds; go through seconds so nothing saturates.
        Duration::try_from_secs_f64(scaled_nanos / 1e9)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Runs `operation` until it succeeds or `policy.max_retries` retries have
/// been spent.
///
/// Every failure is retried; the error of the final attempt is returned
/// unchanged. The backoff sleep starts once the failing attempt has
/// completed.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    policy: &RetryPolicy,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::error::Error + 'static,
{
    let mut retries = 0usize;
    let mut delay = policy.first_delay();

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if retries >= policy.max_retries {
            #[cfg(feature = "tracing")]
            if retries > 0 {
                tracing::warn!(attempts = retries + 1, error = %err, "retries exhausted");
            }
            return Err(err);
        }

        retries += 1;
        if let Some(observer) = &policy.on_retry {
            observer(&RetryAttempt {
                attempt: retries,
                delay,
                error: &err,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt = retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "retrying after failure"
        );

        sleep(delay).await;
        delay = policy.next_delay(delay);
    }
}
