//! HTTP Transport
//!
//! The seam between the resilient client and the wire. A transport sends one
//! request and reports either the raw response (any status) or an
//! `AttemptFailure` when no response was obtained.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::types::{AttemptFailure, HitlensError, RequestFailure, Result};

/// One logical request: method, service-relative path, optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    /// POST with a serialized body. An encoding failure is terminal and
    /// carries this request's operation label.
    pub fn post_json<T: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &T,
    ) -> std::result::Result<Self, RequestFailure> {
        let mut spec = Self {
            method: Method::POST,
            path: path.into(),
            body: None,
        };
        let value = serde_json::to_value(body).map_err(|e| {
            RequestFailure::decode(spec.operation(), 0, format!("encode body: {}", e))
        })?;
        spec.body = Some(value);
        Ok(spec)
    }

    /// Label used in logs and diagnostics, e.g. "POST /predict"
    pub fn operation(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Raw response as received: status and undecoded body
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for sending a single request attempt
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request. Any received response is `Ok`, whatever its status.
    async fn send(&self, request: &RequestSpec) -> std::result::Result<RawResponse, AttemptFailure>;

    /// Transport name for logging
    fn name(&self) -> &str;
}

/// Shared transport type
pub type SharedTransport = Arc<dyn Transport>;

/// reqwest-backed transport against a service base address
pub struct ReqwestTransport {
    base_url: Url,
    client: reqwest::Client,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HitlensError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HitlensError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append a service path to the base address, keeping the base path
    /// (`http://host/api` + `/predict` → `http://host/api/predict`).
    pub fn endpoint(&self, path: &str) -> std::result::Result<Url, AttemptFailure> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| AttemptFailure::unexpected(format!("invalid endpoint '{}': {}", joined, e)))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> std::result::Result<RawResponse, AttemptFailure> {
        let url = self.endpoint(&request.path)?;
        debug!(method = %request.method, %url, "Sending HTTP request");

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                AttemptFailure::unexpected(e.to_string())
            } else {
                AttemptFailure::no_response(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptFailure::no_response(format!("failed to read body: {}", e)))?;

        Ok(RawResponse { status, body })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
