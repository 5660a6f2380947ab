//! Endpoint probing.
//!
//! A [`Probe`] issues a single HTTP GET against one URL with a bounded
//! timeout and classifies the outcome into a [`CheckResult`]. Probes never
//! retry internally; retry behavior lives in [`crate::retry`].

mod error;

pub use error::ProbeError;

use async_trait::async_trait;
use reqwest::Url;
use std::time::{Duration, Instant};

/// Outcome of a single probe (or of a full retry-checked probe).
///
/// The failure reason exists exactly when the endpoint is down, so the
/// "reason present iff not up" invariant is carried by the type itself.
#[derive(Debug, Clone)]
pub enum CheckResult {
    /// The endpoint responded with a status in [200, 400).
    Up { latency: Duration },
    /// The endpoint failed to respond, or responded with an error status.
    /// `latency` is present only when a response was actually obtained.
    Down {
        latency: Option<Duration>,
        reason: ProbeError,
    },
}

impl CheckResult {
    pub fn is_up(&self) -> bool {
        matches!(self, CheckResult::Up { .. })
    }

    /// Latency of the probe, if a response was obtained.
    pub fn latency(&self) -> Option<Duration> {
        match self {
            CheckResult::Up { latency } => Some(*latency),
            CheckResult::Down { latency, .. } => *latency,
        }
    }

    pub fn reason(&self) -> Option<&ProbeError> {
        match self {
            CheckResult::Up { .. } => None,
            CheckResult::Down { reason, .. } => Some(reason),
        }
    }
}

/// A single-attempt endpoint probe.
///
/// Abstracted behind a trait so retry behavior can be unit-tested with a
/// scripted prober instead of a live HTTP server.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Issue one probe against `url`, bounded by `timeout`.
    async fn probe(&self, url: &Url, timeout: Duration) -> CheckResult;
}

/// HTTP prober backed by a pooled `reqwest` client.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Create a prober with a default HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Create a prober with a custom HTTP client (for testing).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Classify a reqwest transport error into a ProbeError.
    fn classify_error(e: reqwest::Error, timeout: Duration) -> ProbeError {
        if e.is_timeout() {
            return ProbeError::Timeout(timeout.as_secs());
        }
        if is_connection_reset(&e) {
            return ProbeError::ConnectionReset(e.to_string());
        }
        // All other transport errors treated as connection failures
        ProbeError::ConnectionFailed(e.to_string())
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk the error source chain looking for a connection-reset class failure.
/// Hyper surfaces a server closing mid-exchange as "connection closed before
/// message completed" rather than an io error, so both shapes are checked.
fn is_connection_reset(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionReset {
                return true;
            }
        }
        if cause
            .to_string()
            .contains("connection closed before message completed")
        {
            return true;
        }
        source = cause.source();
    }
    false
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, url: &Url, timeout: Duration) -> CheckResult {
        let start = Instant::now();

        match self.client.get(url.clone()).timeout(timeout).send().await {
            Ok(response) => {
                let latency = start.elapsed();
                let status = response.status().as_u16();
                // Dropping the response releases the pooled connection on
                // every path; the body is never needed for liveness.
                drop(response);

                if (200..400).contains(&status) {
                    CheckResult::Up { latency }
                } else {
                    CheckResult::Down {
                        latency: Some(latency),
                        reason: ProbeError::HttpStatus(status),
                    }
                }
            }
            Err(e) => CheckResult::Down {
                latency: None,
                reason: Self::classify_error(e, timeout),
            },
        }
    }
}
