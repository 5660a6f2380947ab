//! Unit tests for retry policy.

use super::*;
use crate::probe::{CheckResult, Probe, ProbeError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Prober returning a pre-scripted sequence of results, counting calls.
struct ScriptedProber {
    script: Mutex<VecDeque<CheckResult>>,
    calls: AtomicU32,
}

impl ScriptedProber {
    fn new(results: Vec<CheckResult>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for ScriptedProber {
    async fn probe(&self, _url: &Url, _timeout: Duration) -> CheckResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(CheckResult::Down {
                latency: None,
                reason: ProbeError::ConnectionFailed("script exhausted".to_string()),
            })
    }
}

fn test_url() -> Url {
    Url::parse("http://x/health").unwrap()
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::with_delays(Duration::from_millis(1), Duration::from_millis(1))
}

fn down(reason: ProbeError) -> CheckResult {
    CheckResult::Down {
        latency: None,
        reason,
    }
}

fn up(ms: u64) -> CheckResult {
    CheckResult::Up {
        latency: Duration::from_millis(ms),
    }
}

// ============================================================================
// Outcome classification
// ============================================================================

#[test]
fn test_classify_success() {
    assert!(matches!(classify(&up(10)), Outcome::Success));
}

#[test]
fn test_classify_client_errors_terminal() {
    for code in [400, 401, 403, 404, 410, 422, 499] {
        let result = down(ProbeError::HttpStatus(code));
        assert!(
            matches!(classify(&result), Outcome::Terminal(_)),
            "status {} should be terminal",
            code
        );
    }
}

#[test]
fn test_classify_server_errors_retryable() {
    for code in [500, 502, 503, 504, 599] {
        let result = down(ProbeError::HttpStatus(code));
        assert!(
            matches!(classify(&result), Outcome::Retryable(_)),
            "status {} should be retryable",
            code
        );
    }
}

#[test]
fn test_classify_transport_failures_retryable() {
    let transport = [
        ProbeError::Timeout(5),
        ProbeError::ConnectionFailed("refused".to_string()),
        ProbeError::ConnectionReset("peer reset".to_string()),
    ];
    for reason in transport {
        assert!(matches!(classify(&down(reason)), Outcome::Retryable(_)));
    }
}

// ============================================================================
// Retry loop behavior
// ============================================================================

#[tokio::test]
async fn test_terminal_failure_makes_single_probe_call() {
    let prober = ScriptedProber::new(vec![down(ProbeError::HttpStatus(404))]);
    let policy = fast_policy();

    let result = policy
        .check_with_retry(&prober, &test_url(), Duration::from_secs(1))
        .await;

    assert_eq!(prober.calls(), 1);
    assert!(!result.is_up());
    assert!(matches!(result.reason(), Some(ProbeError::HttpStatus(404))));
}

#[tokio::test]
async fn test_persistent_failure_exhausts_attempts() {
    let prober = ScriptedProber::new(vec![
        down(ProbeError::Timeout(1)),
        down(ProbeError::Timeout(1)),
        down(ProbeError::Timeout(1)),
    ]);
    let policy = fast_policy();

    let result = policy
        .check_with_retry(&prober, &test_url(), Duration::from_secs(1))
        .await;

    assert_eq!(prober.calls(), MAX_ATTEMPTS);
    assert!(!result.is_up());

    let reason = result.reason().unwrap();
    assert!(matches!(
        reason,
        ProbeError::Exhausted { attempts: 3, .. }
    ));
    assert!(reason.to_string().contains("3 attempts"));
}

#[tokio::test]
async fn test_success_after_two_retryable_failures() {
    let prober = ScriptedProber::new(vec![
        down(ProbeError::Timeout(1)),
        down(ProbeError::HttpStatus(500)),
        up(120),
    ]);
    let policy = fast_policy();

    let result = policy
        .check_with_retry(&prober, &test_url(), Duration::from_secs(1))
        .await;

    assert_eq!(prober.calls(), 3);
    assert!(result.is_up());
    // Latency comes from the third, successful attempt
    assert_eq!(result.latency(), Some(Duration::from_millis(120)));
}

#[tokio::test]
async fn test_success_on_first_attempt_skips_retries() {
    let prober = ScriptedProber::new(vec![up(15)]);
    let policy = fast_policy();

    let result = policy
        .check_with_retry(&prober, &test_url(), Duration::from_secs(1))
        .await;

    assert_eq!(prober.calls(), 1);
    assert!(result.is_up());
}

#[tokio::test]
async fn test_exhaustion_preserves_last_latency() {
    let prober = ScriptedProber::new(vec![
        down(ProbeError::HttpStatus(500)),
        down(ProbeError::HttpStatus(500)),
        CheckResult::Down {
            latency: Some(Duration::from_millis(80)),
            reason: ProbeError::HttpStatus(503),
        },
    ]);
    let policy = fast_policy();

    let result = policy
        .check_with_retry(&prober, &test_url(), Duration::from_secs(1))
        .await;

    assert_eq!(result.latency(), Some(Duration::from_millis(80)));
    match result.reason().unwrap() {
        ProbeError::Exhausted { attempts, last } => {
            assert_eq!(*attempts, 3);
            assert!(matches!(**last, ProbeError::HttpStatus(503)));
        }
        other => panic!("expected Exhausted, got {:?}", other),
    }
}

// ============================================================================
// Backoff delays
// ============================================================================

#[test]
fn test_backoff_delay_doubles_per_attempt() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.backoff_delay(1), Duration::from_secs(1));
    assert_eq!(policy.backoff_delay(2), Duration::from_secs(2));
    assert_eq!(policy.backoff_delay(3), Duration::from_secs(4));
}

#[tokio::test]
async fn test_first_attempt_reset_uses_short_delay() {
    // Backoff base is deliberately large; the reset path must not use it.
    let policy = RetryPolicy::with_delays(Duration::from_millis(500), Duration::from_millis(10));
    let prober = ScriptedProber::new(vec![
        down(ProbeError::ConnectionReset("peer reset".to_string())),
        up(20),
    ]);

    let start = Instant::now();
    let result = policy
        .check_with_retry(&prober, &test_url(), Duration::from_secs(1))
        .await;

    assert!(result.is_up());
    assert!(
        start.elapsed() < Duration::from_millis(250),
        "reset retry should not wait a full backoff interval"
    );
}

#[tokio::test]
async fn test_non_reset_failure_waits_backoff() {
    let policy = RetryPolicy::with_delays(Duration::from_millis(100), Duration::from_millis(1));
    let prober = ScriptedProber::new(vec![down(ProbeError::Timeout(1)), up(20)]);

    let start = Instant::now();
    let result = policy
        .check_with_retry(&prober, &test_url(), Duration::from_secs(1))
        .await;

    assert!(result.is_up());
    assert!(
        start.elapsed() >= Duration::from_millis(100),
        "retryable failure should wait the backoff delay"
    );
}

#[tokio::test]
async fn test_reset_on_later_attempt_uses_backoff() {
    // Only a first-attempt reset gets the short delay.
    let policy = RetryPolicy::with_delays(Duration::from_millis(100), Duration::from_millis(1));
    let prober = ScriptedProber::new(vec![
        down(ProbeError::Timeout(1)),
        down(ProbeError::ConnectionReset("peer reset".to_string())),
        up(20),
    ]);

    let start = Instant::now();
    let result = policy
        .check_with_retry(&prober, &test_url(), Duration::from_secs(1))
        .await;

    assert!(result.is_up());
    // attempt 1 backoff (100ms) + attempt 2 backoff (200ms)
    assert!(start.elapsed() >= Duration::from_millis(300));
}
