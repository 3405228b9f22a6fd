//! Service Client
//!
//! - `transport`: single-attempt seam (reqwest in production)
//! - `timeout`: per-attempt deadline
//! - `retry`: endpoint-agnostic retry strategy
//! - `resilient`: timeout + retry + failure normalization
//! - `api`: typed prediction service endpoints

pub mod api;
pub mod resilient;
pub mod retry;
pub mod timeout;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api::PredictionApi;
pub use resilient::{ResilientHttpClient, ResponseBody};
pub use retry::{AttemptOutcome, Classifier, RequestAttempt, RetryPolicy, RetryReport};
pub use timeout::with_timeout;
pub use transport::{RawResponse, ReqwestTransport, RequestSpec, SharedTransport, Transport};
