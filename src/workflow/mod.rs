//! Prediction Workflow
//!
//! - `state`: two-slot state machine (prediction, similar tracks)
//! - `orchestrator`: validation gate and the two-stage submission cycle

pub mod orchestrator;
pub mod state;

pub use orchestrator::{SubmitOutcome, WorkflowOrchestrator};
pub use state::{BlockedSubmission, PrimaryStage, SimilarStage, WorkflowState};
