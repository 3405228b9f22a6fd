//! Workflow State Machine
//!
//! Two independent result slots: the primary (prediction) stage and the
//! dependent (similar tracks) stage. Each has its own result and its own error,
//! so a failure in one never overwrites the other.
//!
//! ## Transitions
//!
//! ```text
//! Primary:
//!   any --[valid record]----> Submitting
//!   Submitting --[ok]-------> PredictionReady
//!   Submitting --[failed]---> PredictionFailed
//!
//! Similar:
//!   any --[new cycle]-------------> Idle
//!   Idle --[prediction ready]-----> Loading
//!   Loading --[ok]----------------> Ready
//!   Loading --[failed]------------> Failed
//! ```
//!
//! An invalid record changes neither stage. It only sets the workflow-level
//! `blocked` slot, which the next cycle clears.
//!
//! Every accepted submission starts a new cycle. Results are applied only when
//! they belong to the current cycle, so a late result from an abandoned cycle
//! is dropped.

use std::fmt;

use crate::types::{PredictionOutcome, SimilarTrack};
use crate::validation::ValidationResult;

/// Prediction stage
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PrimaryStage {
    #[default]
    Idle,
    Submitting,
    PredictionReady(PredictionOutcome),
    PredictionFailed {
        message: String,
    },
}

impl fmt::Display for PrimaryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Submitting => write!(f, "SUBMITTING"),
            Self::PredictionReady(_) => write!(f, "PREDICTION_READY"),
            Self::PredictionFailed { .. } => write!(f, "PREDICTION_FAILED"),
        }
    }
}

/// Similar-tracks stage
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SimilarStage {
    #[default]
    Idle,
    Loading,
    Ready(Vec<SimilarTrack>),
    Failed {
        message: String,
    },
}

impl fmt::Display for SimilarStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "SIMILAR_IDLE"),
            Self::Loading => write!(f, "SIMILAR_LOADING"),
            Self::Ready(_) => write!(f, "SIMILAR_READY"),
            Self::Failed { .. } => write!(f, "SIMILAR_FAILED"),
        }
    }
}

/// Submission refused locally; no request was issued
#[derive(Debug, Clone, PartialEq)]
pub struct BlockedSubmission {
    pub message: String,
    pub field_errors: ValidationResult,
}

/// Whole workflow state. Mutated only through the transition methods below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub primary: PrimaryStage,
    pub similar: SimilarStage,
    blocked: Option<BlockedSubmission>,
    cycle: u64,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// A cycle is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self.primary, PrimaryStage::Submitting)
            || matches!(self.similar, SimilarStage::Loading)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Refuse a submission. Both stages and the cycle are left as they are.
    pub fn block(&mut self, message: impl Into<String>, field_errors: ValidationResult) {
        self.blocked = Some(BlockedSubmission {
            message: message.into(),
            field_errors,
        });
    }

    /// Reset both stages and enter `Submitting`. Returns the new cycle id.
    pub fn begin_cycle(&mut self) -> u64 {
        self.cycle += 1;
        self.blocked = None;
        self.primary = PrimaryStage::Submitting;
        self.similar = SimilarStage::Idle;
        self.cycle
    }

    /// Store the outcome and start the dependent stage.
    pub fn prediction_succeeded(&mut self, cycle: u64, outcome: PredictionOutcome) -> bool {
        if !self.accepts(cycle) || self.primary != PrimaryStage::Submitting {
            return false;
        }
        self.primary = PrimaryStage::PredictionReady(outcome);
        self.similar = SimilarStage::Loading;
        true
    }

    /// Record the failure; the dependent stage stays idle.
    pub fn prediction_failed(&mut self, cycle: u64, message: impl Into<String>) -> bool {
        if !self.accepts(cycle) || self.primary != PrimaryStage::Submitting {
            return false;
        }
        self.primary = PrimaryStage::PredictionFailed {
            message: message.into(),
        };
        self.similar = SimilarStage::Idle;
        true
    }

    pub fn similar_succeeded(&mut self, cycle: u64, tracks: Vec<SimilarTrack>) -> bool {
        if !self.accepts(cycle) || self.similar != SimilarStage::Loading {
            return false;
        }
        self.similar = SimilarStage::Ready(tracks);
        true
    }

    /// Record the dependent failure. Never touches the primary slot.
    pub fn similar_failed(&mut self, cycle: u64, message: impl Into<String>) -> bool {
        if !self.accepts(cycle) || self.similar != SimilarStage::Loading {
            return false;
        }
        self.similar = SimilarStage::Failed {
            message: message.into(),
        };
        true
    }

    /// Back to idle; anything still in flight is discarded when it lands.
    pub fn reset(&mut self) {
        self.cycle += 1;
        self.blocked = None;
        self.primary = PrimaryStage::Idle;
        self.similar = SimilarStage::Idle;
    }

    fn accepts(&self, cycle: u64) -> bool {
        cycle == self.cycle
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn prediction(&self) -> Option<&PredictionOutcome> {
        match &self.primary {
            PrimaryStage::PredictionReady(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Workflow-level error: blocked submission, else failed prediction
    pub fn primary_error(&self) -> Option<&str> {
        if let Some(blocked) = &self.blocked {
            return Some(&blocked.message);
        }
        match &self.primary {
            PrimaryStage::PredictionFailed { message } => Some(message),
            _ => None,
        }
    }

    pub fn blocked(&self) -> Option<&BlockedSubmission> {
        self.blocked.as_ref()
    }

    pub fn field_errors(&self) -> Option<&ValidationResult> {
        self.blocked.as_ref().map(|blocked| &blocked.field_errors)
    }

    /// Current track list; empty unless the stage is ready
    pub fn similar_tracks(&self) -> &[SimilarTrack] {
        match &self.similar {
            SimilarStage::Ready(tracks) => tracks,
            _ => &[],
        }
    }

    pub fn similar_error(&self) -> Option<&str> {
        match &self.similar {
            SimilarStage::Failed { message } => Some(message),
            _ => None,
        }
    }
}
