//! Per-endpoint status tracking.

use crate::probe::CheckResult;
use chrono::{DateTime, Utc};

/// Last observed liveness of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointStatus {
    Unknown,
    Up,
    Down,
}

/// Tracks check state for a single endpoint across cycles.
#[derive(Debug, Clone)]
pub struct EndpointState {
    /// Last known status (for detecting transitions)
    pub last_status: EndpointStatus,
    /// When the last check completed
    pub last_check_time: Option<DateTime<Utc>>,
}

impl Default for EndpointState {
    fn default() -> Self {
        Self {
            last_status: EndpointStatus::Unknown,
            last_check_time: None,
        }
    }
}

impl EndpointState {
    /// Apply a check result. Returns the new status if it changed.
    ///
    /// The retry policy has already absorbed transient blips by the time a
    /// result lands here, so transitions are reported without debounce
    /// thresholds.
    pub fn apply_result(&mut self, result: &CheckResult) -> Option<EndpointStatus> {
        self.last_check_time = Some(Utc::now());

        let observed = if result.is_up() {
            EndpointStatus::Up
        } else {
            EndpointStatus::Down
        };

        if observed != self.last_status {
            self.last_status = observed;
            Some(observed)
        } else {
            None
        }
    }
}
