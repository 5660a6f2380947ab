//! Error types for endpoint probing.

use thiserror::Error;

/// Failures observed while probing an endpoint.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection reset before a response was received
    #[error("connection reset: {0}")]
    ConnectionReset(String),

    /// Response received with a non-success status
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Retry budget spent without a successful response
    #[error("all {attempts} attempts failed: {last}")]
    Exhausted { attempts: u32, last: Box<ProbeError> },
}
