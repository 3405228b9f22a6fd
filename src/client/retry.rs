//! Retry Strategy
//!
//! Bounded retry with exponential backoff, decoupled from any endpoint.
//!
//! ## Strategy
//!
//! 1. Run the attempt
//! 2. On failure, classify it with the configured classifier
//! 3. If retryable and attempts remain, sleep the backoff delay and retry
//! 4. Otherwise stop and hand back the last failure
//!
//! Every attempt is recorded as a `RequestAttempt` for logging and tests.
//! Sleeping is a tokio timer, so other tasks keep running during backoff.

use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::constants::retry as retry_constants;
use crate::types::{AttemptFailure, FailureCategory, classify_failure};

/// Maps a failed attempt to a category; retryable categories are retried.
pub type Classifier = fn(&AttemptFailure) -> FailureCategory;

/// Outcome of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    RetryableFailure(FailureCategory),
    TerminalFailure(FailureCategory),
}

/// One try of a network call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestAttempt {
    /// Zero-based attempt index
    pub index: usize,
    /// Wall time spent in the attempt itself
    pub elapsed: Duration,
    /// Backoff scheduled after this attempt, if another one followed
    pub delay: Option<Duration>,
    pub outcome: AttemptOutcome,
}

/// Final result of a retried operation plus its attempt log
#[derive(Debug)]
pub struct RetryReport<T> {
    pub result: Result<T, AttemptFailure>,
    pub attempts: Vec<RequestAttempt>,
}

impl<T> RetryReport<T> {
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Backoff delays actually scheduled, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.attempts.iter().filter_map(|a| a.delay).collect()
    }
}

/// Retry policy: attempt budget, backoff configuration and classifier
#[derive(Clone)]
pub struct RetryPolicy {
    /// Maximum total attempts (first try included)
    pub max_attempts: usize,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Growth factor applied to each subsequent delay
    pub factor: f32,
    pub classifier: Classifier,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("factor", &self.factor)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_constants::MAX_ATTEMPTS,
            base_delay: Duration::from_millis(retry_constants::BASE_DELAY_MS),
            factor: retry_constants::BACKOFF_FACTOR,
            classifier: classify_failure,
        }
    }
}

impl RetryPolicy {
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Backoff schedule: `base × factor^i` between attempt `i` and `i + 1`,
    /// no jitter.
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_factor(self.factor)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }

    pub fn is_retryable(&self, failure: &AttemptFailure) -> bool {
        (self.classifier)(failure).is_retryable()
    }

    /// Run `attempt` under this policy
    pub async fn run<T, F, Fut>(&self, operation: &str, mut attempt: F) -> RetryReport<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptFailure>>,
    {
        let classifier = self.classifier;
        let max_attempts = self.max_attempts;
        let attempts: Mutex<Vec<RequestAttempt>> = Mutex::new(Vec::new());
        let next_index = AtomicUsize::new(0);

        let result = (|| {
            let index = next_index.fetch_add(1, Ordering::SeqCst);
            let pending = attempt();
            let attempts = &attempts;
            async move {
                let started = Instant::now();
                debug!(operation, attempt = index + 1, max_attempts, "Request attempt");

                let result = pending.await;
                let outcome = match &result {
                    Ok(_) => AttemptOutcome::Success,
                    Err(failure) => {
                        let category = classifier(failure);
                        if category.is_retryable() {
                            AttemptOutcome::RetryableFailure(category)
                        } else {
                            AttemptOutcome::TerminalFailure(category)
                        }
                    }
                };

                lock(attempts).push(RequestAttempt {
                    index,
                    elapsed: started.elapsed(),
                    delay: None,
                    outcome,
                });
                result
            }
        })
        .retry(self.backoff())
        .sleep(tokio::time::sleep)
        .when(|failure: &AttemptFailure| classifier(failure).is_retryable())
        .notify(|failure: &AttemptFailure, delay: Duration| {
            let mut recorded = lock(&attempts);
            let failed_attempt = recorded.len();
            if let Some(last) = recorded.last_mut() {
                last.delay = Some(delay);
            }
            warn!(
                operation,
                attempt = failed_attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                failure = %failure,
                "Request attempt failed, retrying"
            );
        })
        .await;

        let attempts = attempts
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        RetryReport { result, attempts }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::error!("Retry attempt log poisoned, recovering");
        poisoned.into_inner()
    })
}
