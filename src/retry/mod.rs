//! Retry policy for endpoint checks.
//!
//! Wraps a [`Probe`] in a bounded retry loop. Failures are classified into
//! retryable and terminal classes by a pure function, so the policy can be
//! exercised with a scripted prober in tests. Retryable failures wait an
//! exponentially growing backoff between attempts; client-class HTTP errors
//! return immediately without consuming the remaining budget.

#[cfg(test)]
mod tests;

use crate::probe::{CheckResult, Probe, ProbeError};
use reqwest::Url;
use std::time::Duration;

/// Maximum probe attempts per check.
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between retryable attempts.
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Short fixed delay used when the very first attempt dies to a connection
/// reset. Keep-alive races resolve on an immediate retry; a full backoff
/// interval is not worth waiting.
const RESET_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Classification of a probe outcome.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The probe succeeded; no further attempts are needed.
    Success,
    /// Transient failure class: worth retrying.
    Retryable(ProbeError),
    /// Permanent failure class: retrying an unchanged endpoint cannot help.
    Terminal(ProbeError),
}

/// Classify a probe result.
///
/// Client-class HTTP statuses (4xx) are terminal. Network errors, timeouts,
/// and server-class statuses (5xx) are retryable.
pub fn classify(result: &CheckResult) -> Outcome {
    match result {
        CheckResult::Up { .. } => Outcome::Success,
        CheckResult::Down { reason, .. } => match reason {
            ProbeError::HttpStatus(code) if (400..500).contains(code) => {
                Outcome::Terminal(reason.clone())
            }
            other => Outcome::Retryable(other.clone()),
        },
    }
}

/// Bookkeeping for one failed attempt within a check invocation.
#[derive(Debug, Clone)]
struct AttemptRecord {
    latency: Option<Duration>,
    error: ProbeError,
}

/// Bounded retry loop over a [`Probe`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
    reset_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            backoff_base: BACKOFF_BASE,
            reset_delay: RESET_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy with custom delays (for testing).
    pub fn with_delays(backoff_base: Duration, reset_delay: Duration) -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            backoff_base,
            reset_delay,
        }
    }

    /// Backoff delay before the attempt following `attempt` (1-based):
    /// base * 2^(attempt - 1).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Check `url`, retrying retryable failures up to the attempt budget.
    ///
    /// Returns the first successful or terminal result. When the budget is
    /// exhausted the result carries [`ProbeError::Exhausted`] naming the
    /// attempt count and the last underlying error.
    pub async fn check_with_retry(
        &self,
        prober: &dyn Probe,
        url: &Url,
        timeout: Duration,
    ) -> CheckResult {
        let mut last: Option<AttemptRecord> = None;

        for attempt in 1..=self.max_attempts {
            let result = prober.probe(url, timeout).await;

            match classify(&result) {
                Outcome::Success => {
                    tracing::debug!(url = %url, attempt, "probe succeeded");
                    return result;
                }
                Outcome::Terminal(reason) => {
                    tracing::debug!(
                        url = %url,
                        attempt,
                        error = %reason,
                        "terminal failure, not retrying"
                    );
                    return result;
                }
                Outcome::Retryable(reason) => {
                    tracing::debug!(
                        url = %url,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %reason,
                        "probe attempt failed"
                    );

                    if attempt < self.max_attempts {
                        let delay =
                            if attempt == 1 && matches!(reason, ProbeError::ConnectionReset(_)) {
                                self.reset_delay
                            } else {
                                self.backoff_delay(attempt)
                            };
                        tokio::time::sleep(delay).await;
                    }

                    last = Some(AttemptRecord {
                        latency: result.latency(),
                        error: reason,
                    });
                }
            }
        }

        match last {
            Some(record) => CheckResult::Down {
                latency: record.latency,
                reason: ProbeError::Exhausted {
                    attempts: self.max_attempts,
                    last: Box::new(record.error),
                },
            },
            // max_attempts is always at least 1, so the loop records a
            // failure before falling through
            None => CheckResult::Down {
                latency: None,
                reason: ProbeError::Exhausted {
                    attempts: 0,
                    last: Box::new(ProbeError::ConnectionFailed("no attempts made".to_string())),
                },
            },
        }
    }
}
