//! Bounded exponential backoff for transient provider failures.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ProviderError;

/// How many times, and how patiently, a transient failure is retried.
///
/// Only errors for which [`ProviderError::is_transient`] holds are retried;
/// every other outcome, including successful "negative" answers, returns
/// immediately.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use hoseline_core::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.backoff_for(1), Duration::from_millis(200));
/// assert_eq!(policy.backoff_for(2), Duration::from_millis(400));
/// assert_eq!(policy.backoff_for(10), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    #[serde(with = "millis")]
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    #[serde(with = "millis")]
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Override the attempt budget.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1_u32 << exponent)
            .min(self.max_backoff)
    }

    /// Run `operation` until it succeeds, fails permanently or the attempt
    /// budget is spent.
    ///
    /// `classify` extracts the provider failure, if any, from an error so
    /// that domain answers wrapped in the same error type are never retried.
    pub async fn run<T, E, F, Fut>(
        &self,
        label: &str,
        classify: impl Fn(&E) -> Option<&ProviderError>,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let transient = classify(&err).is_some_and(ProviderError::is_transient);
                    if !transient || attempt >= attempts {
                        return Err(err);
                    }
                    let delay = self.backoff_for(attempt);
                    if let Some(cause) = classify(&err) {
                        log::warn!(
                            "{label}: attempt {attempt}/{attempts} failed ({cause}); retrying in {delay:?}"
                        );
                    }
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
