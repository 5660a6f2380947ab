//! Check result reporting.
//!
//! A [`CheckReport`] is a completed check tagged with the endpoint's name
//! and URL. [`format_report`] renders the status line consumers depend on:
//!
//! ```text
//! db (http://x/health) → UP (120 ms)
//! api (https://api.example.com/healthz) → DOWN (HTTP error: 503)
//! ```

use crate::probe::CheckResult;
use colored::Colorize;
use reqwest::Url;

/// A completed endpoint check, tagged for reporting.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub name: String,
    pub url: Url,
    pub result: CheckResult,
}

/// Render the reporting contract line for a completed check.
pub fn format_report(report: &CheckReport) -> String {
    match &report.result {
        CheckResult::Up { latency } => format!(
            "{} ({}) → UP ({} ms)",
            report.name,
            report.url,
            latency.as_millis()
        ),
        CheckResult::Down { reason, .. } => {
            format!("{} ({}) → DOWN ({})", report.name, report.url, reason)
        }
    }
}

/// Receives completed check reports.
pub trait ResultSink: Send + Sync {
    fn publish(&self, report: &CheckReport);
}

/// Sink that prints the contract line to stdout, colored for terminals.
pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn publish(&self, report: &CheckReport) {
        let line = format_report(report);
        if report.result.is_up() {
            println!("{}", line.green());
        } else {
            println!("{}", line.red());
        }
    }
}
