//! Resilient HTTP Client
//!
//! Generic request executor: per-attempt timeout, bounded exponential
//! backoff, failure classification, and normalization of every failure into a
//! single user-safe message. Knows nothing about features or predictions.
//!
//! Timeout, attempt budget and backoff are fixed per client; callers cannot
//! override them per call.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::retry::RetryPolicy;
use super::timeout::with_timeout;
use super::transport::{RawResponse, RequestSpec, SharedTransport};
use crate::constants::network as net_constants;
use crate::types::{AttemptFailure, RequestFailure};

/// Successful response body plus the attempts it took
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBody {
    pub json: Value,
    pub attempts: usize,
    operation: String,
}

impl ResponseBody {
    /// Decode into a typed payload; a shape mismatch is a terminal decode
    /// failure.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, RequestFailure> {
        serde_json::from_value(self.json)
            .map_err(|e| RequestFailure::decode(&self.operation, self.attempts, e.to_string()))
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

pub struct ResilientHttpClient {
    transport: SharedTransport,
    policy: RetryPolicy,
    timeout: Duration,
}

impl std::fmt::Debug for ResilientHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientHttpClient")
            .field("transport", &self.transport.name())
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ResilientHttpClient {
    pub fn new(transport: SharedTransport) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            timeout: Duration::from_secs(net_constants::REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute with retries
    #[instrument(skip(self, request), fields(operation = %request.operation()))]
    pub async fn execute(&self, request: &RequestSpec) -> Result<ResponseBody, RequestFailure> {
        self.execute_with(&self.policy, request).await
    }

    /// Execute a single attempt, no retries
    #[instrument(skip(self, request), fields(operation = %request.operation()))]
    pub async fn execute_once(&self, request: &RequestSpec) -> Result<ResponseBody, RequestFailure> {
        let single = self.policy.clone().with_max_attempts(1);
        self.execute_with(&single, request).await
    }

    async fn execute_with(
        &self,
        policy: &RetryPolicy,
        request: &RequestSpec,
    ) -> Result<ResponseBody, RequestFailure> {
        let operation = request.operation();
        let report = policy
            .run(&operation, || self.attempt(request, &operation))
            .await;
        let attempts = report.attempt_count();

        match report.result {
            Ok(raw) => {
                debug!(operation, attempts, status = raw.status, "Request succeeded");
                let json = parse_body(&raw.body)
                    .map_err(|e| RequestFailure::decode(&operation, attempts, e))?;
                Ok(ResponseBody {
                    json,
                    attempts,
                    operation,
                })
            }
            Err(failure) => {
                let category = (policy.classifier)(&failure);
                let failure = RequestFailure::from_attempt(failure, category, &operation, attempts);
                let diagnostics = failure.diagnostics();
                error!(
                    operation,
                    attempts,
                    %category,
                    status = ?diagnostics.status,
                    error_code = ?diagnostics.error_code,
                    body = ?diagnostics.body,
                    detail = ?diagnostics.detail,
                    "Request failed"
                );
                Err(failure)
            }
        }
    }

    /// One attempt: send under the timeout, turn non-success statuses into
    /// failures.
    async fn attempt(
        &self,
        request: &RequestSpec,
        operation: &str,
    ) -> Result<RawResponse, AttemptFailure> {
        let response =
            with_timeout(self.timeout, self.transport.send(request), operation).await?;

        if response.is_success() {
            Ok(response)
        } else {
            Err(AttemptFailure::status(response.status, response.body))
        }
    }
}

fn parse_body(body: &str) -> Result<Value, String> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| format!("invalid JSON body: {}", e))
}
