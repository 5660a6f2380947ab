//! Scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the shared-tick scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Period of the shared tick driving all endpoint checks, in seconds.
    pub tick_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { tick_seconds: 15 }
    }
}

impl SchedulerConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(self.tick_seconds)
    }
}
