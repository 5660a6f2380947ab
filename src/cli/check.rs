//! Check command implementation

use crate::cli::CheckArgs;
use crate::probe::{CheckResult, HttpProber};
use crate::report::{format_report, CheckReport};
use crate::retry::RetryPolicy;
use serde_json::json;
use std::time::Duration;

/// Run a one-shot retry-checked probe of a single URL.
///
/// Returns the rendered output and whether the endpoint was up; the caller
/// decides the process exit code.
pub async fn run_check(args: &CheckArgs) -> Result<(String, bool), Box<dyn std::error::Error>> {
    let url = reqwest::Url::parse(&args.url).map_err(|e| format!("Invalid URL: {}", e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("Unsupported URL scheme: {}", url.scheme()).into());
    }

    let name = args
        .name
        .clone()
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "endpoint".to_string());

    let prober = HttpProber::new();
    let policy = RetryPolicy::new();
    let result = policy
        .check_with_retry(&prober, &url, Duration::from_secs(args.timeout))
        .await;

    let report = CheckReport { name, url, result };
    let up = report.result.is_up();

    let output = if args.json {
        format_check_json(&report)?
    } else {
        format_report(&report)
    };

    Ok((output, up))
}

fn format_check_json(report: &CheckReport) -> Result<String, Box<dyn std::error::Error>> {
    let value = match &report.result {
        CheckResult::Up { latency } => json!({
            "name": report.name,
            "url": report.url.as_str(),
            "up": true,
            "latency_ms": latency.as_millis() as u64,
        }),
        CheckResult::Down { latency, reason } => json!({
            "name": report.name,
            "url": report.url.as_str(),
            "up": false,
            "latency_ms": latency.map(|l| l.as_millis() as u64),
            "reason": reason.to_string(),
        }),
    };

    Ok(serde_json::to_string_pretty(&value)?)
}
