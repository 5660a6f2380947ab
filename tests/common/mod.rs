//! Shared test utilities for Vigil integration tests.
//!
//! Provides reusable helpers for building endpoint entries, schedulers,
//! and a collecting sink to reduce duplication across test files.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use vigil::config::{EndpointConfig, SchedulerConfig};
use vigil::probe::{HttpProber, Probe};
use vigil::report::{CheckReport, ResultSink};
use vigil::retry::RetryPolicy;
use vigil::scheduler::Scheduler;

/// Create an endpoint entry pointing at `url`.
pub fn make_endpoint(name: &str, url: &str, interval_seconds: u64) -> EndpointConfig {
    EndpointConfig {
        name: name.to_string(),
        url: url.to_string(),
        timeout_seconds: 1,
        interval_seconds,
    }
}

/// A retry policy with millisecond delays so tests never wait for real
/// backoff intervals.
pub fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy::with_delays(Duration::from_millis(1), Duration::from_millis(1))
}

/// Sink that records every published report.
#[derive(Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<CheckReport>>,
}

impl CollectingSink {
    pub fn reports(&self) -> Vec<CheckReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

impl ResultSink for CollectingSink {
    fn publish(&self, report: &CheckReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}

/// Scheduler wired to a real HTTP prober, a fast retry policy, and a
/// collecting sink (most common integration-test shape).
pub fn make_scheduler(tick_seconds: u64) -> (Scheduler, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::default());
    let prober: Arc<dyn Probe> = Arc::new(HttpProber::new());
    let scheduler = Scheduler::new(
        SchedulerConfig { tick_seconds },
        fast_retry_policy(),
        prober,
        sink.clone() as Arc<dyn ResultSink>,
    );
    (scheduler, sink)
}
