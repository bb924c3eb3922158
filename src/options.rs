use std::time::Duration;

use crate::{retry::RetryPolicy, Result};

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound for any single backoff delay in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor between consecutive delays. Must be greater than 1.
    pub exponential_base: f64,
}

impl ClientOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builds the retry policy these options describe, without an observer.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::default()
            .with_max_retries(self.max_retries)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_exponential_base(self.exponential_base)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 60_000,
            exponential_base: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ClientOptions;

    #[test]
    fn default_policy_matches_default_options() {
        let policy = ClientOptions::default()
            .retry_policy()
            .expect("defaults must be valid");
        assert_eq!(policy.max_retries(), 3);
        assert_eq!(policy.initial_delay(), Duration::from_secs(1));
        assert_eq!(policy.max_delay(), Duration::from_secs(60));
    }

    #[test]
    fn rejects_non_growing_base() {
        let options = ClientOptions {
            exponential_base: 1.0,
            ..ClientOptions::default()
        };
        assert!(options.retry_policy().is_err());
    }
}
