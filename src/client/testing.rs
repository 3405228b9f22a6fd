//! Scripted in-memory transport for tests.
//!
//! Each path has a queue of steps; every request to that path consumes the
//! next step. Requests to a path with an empty queue fail as "no response".

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use super::transport::{RawResponse, RequestSpec, Transport};
use crate::types::AttemptFailure;

#[derive(Debug, Clone)]
pub enum Step {
    Respond { status: u16, body: String },
    RespondAfter { delay: Duration, status: u16, body: String },
    NoResponse,
    Hang,
}

impl Step {
    pub fn json(status: u16, body: Value) -> Self {
        Self::Respond {
            status,
            body: body.to_string(),
        }
    }

    pub fn json_after(delay: Duration, status: u16, body: Value) -> Self {
        Self::RespondAfter {
            delay,
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub body: Option<Value>,
    pub at: Instant,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, path: &str, step: Step) {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(step);
    }

    pub fn push_many(&self, path: &str, steps: impl IntoIterator<Item = Step>) {
        for step in steps {
            self.push(path, step);
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.path == path)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse, AttemptFailure> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: request.path.clone(),
            body: request.body.clone(),
            at: Instant::now(),
        });

        let step = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front);

        match step {
            Some(Step::Respond { status, body }) => Ok(RawResponse { status, body }),
            Some(Step::RespondAfter {
                delay,
                status,
                body,
            }) => {
                tokio::time::sleep(delay).await;
                Ok(RawResponse { status, body })
            }
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AttemptFailure::no_response("hung"))
            }
            Some(Step::NoResponse) | None => {
                Err(AttemptFailure::no_response("connection refused"))
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
