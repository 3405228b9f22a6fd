//! Per-Attempt Timeout
//!
//! Wraps a single request attempt so that an attempt which outlives its
//! deadline is reported as "no response received", the same way a refused
//! connection is. The transport may enforce its own timeout too; this one
//! applies to every transport, including in-memory ones.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::client::timeout::with_timeout;
//!
//! let response = with_timeout(
//!     Duration::from_secs(10),
//!     transport.send(&request),
//!     "POST /predict",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::types::AttemptFailure;

/// Execute an attempt with a timeout
///
/// Returns `AttemptFailure::NoResponse` if the attempt doesn't complete within
/// the specified duration.
pub async fn with_timeout<T, F>(
    timeout: Duration,
    future: F,
    operation: &str,
) -> Result<T, AttemptFailure>
where
    F: Future<Output = Result<T, AttemptFailure>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(AttemptFailure::no_response(format!(
            "{} timed out after {:?}",
            operation, timeout
        ))),
    }
}
