//! hitlens - Resilient Hit Prediction Client
//!
//! Client for a track-statistics service: validates a track's 13 audio
//! features, requests a hit/miss prediction, then looks up similar tracks.
//!
//! ## Core Features
//!
//! - **Validation**: per-field closed ranges, checked before any request
//! - **Resilient Client**: 10s per-attempt timeout, 3 attempts, 1s/2s backoff
//! - **Isolated Stages**: a failed similar-track lookup never discards a
//!   prediction
//! - **Normalized Errors**: one user-safe message per failure, full detail in
//!   logs
//!
//! ## Quick Start
//!
//! ```ignore
//! use hitlens::{FeatureRecord, PredictionApi, SubmitOutcome, WorkflowOrchestrator};
//!
//! let api = PredictionApi::connect("http://localhost:5000/api")?;
//! let orchestrator = WorkflowOrchestrator::new(api);
//! if let SubmitOutcome::Finished(state) = orchestrator.submit(&record).await {
//!     println!("{:?} / {:?}", state.prediction(), state.similar_tracks());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: feature record, service payloads, error taxonomy
//! - [`validation`]: per-field range checks
//! - [`client`]: transport, retry strategy, resilient client, typed API
//! - [`workflow`]: two-stage state machine and orchestrator
//! - [`config`]: layered configuration

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod types;
pub mod validation;
pub mod workflow;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{FailureCategory, HitlensError, RequestFailure, Result};

// Domain
pub use types::{FeatureField, FeatureRecord, PredictionOutcome, SimilarTrack, TrackFeatures};
pub use validation::{ValidationResult, validate_all, validate_field};

// =============================================================================
// Client & Workflow Re-exports
// =============================================================================

pub use client::{PredictionApi, ResilientHttpClient, RetryPolicy, with_timeout};
pub use workflow::{SubmitOutcome, WorkflowOrchestrator, WorkflowState};
