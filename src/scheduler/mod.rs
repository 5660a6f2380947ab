//! Multi-endpoint check scheduling.
//!
//! One shared low-resolution timer drives every endpoint's checks; there is
//! no per-endpoint timer. Each registered endpoint gets a precomputed
//! "ticks owed" divisor (its interval expressed in ticks) and is due on a
//! cycle iff `cycle_count % ticks_owed == 0`. The cycle counter starts at 0
//! and is incremented *before* the due test, so the first timer tick
//! evaluates as cycle 1; baseline coverage of cycle 0 comes from an
//! unconditional pass over all endpoints executed once before the tick
//! loop starts.

mod state;


pub use state::{EndpointState, EndpointStatus};

use crate::config::{EndpointConfig, EndpointSpec, SchedulerConfig};
use crate::probe::Probe;
use crate::report::{CheckReport, ResultSink};
use crate::retry::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Ticks between checks for an endpoint: interval / tick, rounded, floor 1.
///
/// An endpoint with an interval shorter than the tick period is probed on
/// every tick; longer intervals skip ticks proportionally. Scheduling is
/// approximate, not wall-clock-exact.
pub fn ticks_owed(interval: Duration, tick_period: Duration) -> u64 {
    let ratio = interval.as_secs_f64() / tick_period.as_secs_f64();
    (ratio.round() as u64).max(1)
}

/// A registered endpoint with its precomputed tick divisor and state.
#[derive(Debug, Clone)]
struct ScheduledEndpoint {
    spec: EndpointSpec,
    ticks_owed: u64,
    state: EndpointState,
}

/// Drives endpoint checks off a single shared tick until cancelled.
///
/// Owns the endpoint registry and all mutable scheduling state; the
/// registry is read-only once `run` starts, and `cycle_count` is mutated
/// only by the scheduler's own loop.
pub struct Scheduler {
    config: SchedulerConfig,
    retry: RetryPolicy,
    prober: Arc<dyn Probe>,
    sink: Arc<dyn ResultSink>,
    endpoints: Vec<ScheduledEndpoint>,
    cycle_count: u64,
}

impl Scheduler {
    pub fn new(
        config: SchedulerConfig,
        retry: RetryPolicy,
        prober: Arc<dyn Probe>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            config,
            retry,
            prober,
            sink,
            endpoints: Vec::new(),
            cycle_count: 0,
        }
    }

    /// Register one endpoint entry.
    ///
    /// A malformed entry is skipped with a diagnostic and `false` is
    /// returned; registration of subsequent entries is unaffected.
    pub fn register(&mut self, entry: &EndpointConfig) -> bool {
        match EndpointSpec::try_from(entry) {
            Ok(spec) => {
                let owed = ticks_owed(spec.interval, self.config.tick_period());
                tracing::info!(
                    name = %spec.name,
                    url = %spec.url,
                    interval_seconds = spec.interval.as_secs(),
                    ticks_owed = owed,
                    "Registered endpoint"
                );
                self.endpoints.push(ScheduledEndpoint {
                    spec,
                    ticks_owed: owed,
                    state: EndpointState::default(),
                });
                true
            }
            Err(e) => {
                tracing::warn!(
                    name = %entry.name,
                    url = %entry.url,
                    error = %e,
                    "Skipping malformed endpoint entry"
                );
                false
            }
        }
    }

    /// Register a list of endpoint entries, returning how many were accepted.
    pub fn register_all(&mut self, entries: &[EndpointConfig]) -> usize {
        entries.iter().filter(|e| self.register(e)).count()
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Run one unconditional pass over all endpoints, ignoring due-ness.
    pub async fn run_once(&mut self) {
        self.run_pass(false).await;
    }

    /// Check endpoints sequentially, publishing each result to the sink.
    /// With `due_only`, endpoints whose divisor doesn't divide the current
    /// cycle are skipped.
    async fn run_pass(&mut self, due_only: bool) {
        for i in 0..self.endpoints.len() {
            if due_only && self.cycle_count % self.endpoints[i].ticks_owed != 0 {
                continue;
            }

            let spec = self.endpoints[i].spec.clone();
            let result = self
                .retry
                .check_with_retry(self.prober.as_ref(), &spec.url, spec.timeout)
                .await;

            if let Some(status) = self.endpoints[i].state.apply_result(&result) {
                tracing::info!(
                    endpoint = %spec.name,
                    url = %spec.url,
                    status = ?status,
                    "Endpoint status changed"
                );
            }

            self.sink.publish(&CheckReport {
                name: spec.name,
                url: spec.url,
                result,
            });
        }
    }

    /// Run until cancelled.
    ///
    /// Executes the baseline pass, then blocks on "next tick or
    /// cancellation" only. Probe timeouts are bounded, so a worst-case pass
    /// finishes within its retry budget and cancellation is observed at the
    /// next loop iteration.
    pub async fn run(mut self, cancel_token: CancellationToken) {
        tracing::info!(
            tick_seconds = self.config.tick_seconds,
            endpoints = self.endpoints.len(),
            "Scheduler started"
        );

        // Baseline status for the operator before the first due tick.
        self.run_pass(false).await;

        // First tick lands one full period out; t=0 was just covered.
        let start = tokio::time::Instant::now() + self.config.tick_period();
        let mut interval = tokio::time::interval_at(start, self.config.tick_period());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    tracing::info!("Scheduler shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.cycle_count += 1;
                    self.run_pass(true).await;
                    tracing::debug!(cycle = self.cycle_count, "Check cycle completed");
                }
            }
        }
    }

    /// Start the scheduler as a background task.
    /// Returns a JoinHandle that resolves when the scheduler stops.
    pub fn start(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel_token).await })
    }
}
