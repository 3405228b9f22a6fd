//! Prediction Workflow Orchestrator
//!
//! Drives one submission cycle: validate, predict, then look up similar
//! tracks. The dependent lookup runs with its own retry budget and its own
//! error slot; its failure never discards a prediction.
//!
//! Only one cycle is in flight at a time. The state lock is never held across
//! a network call.

use std::sync::{Mutex, MutexGuard};
use tracing::{info, instrument, warn};

use super::state::WorkflowState;
use crate::client::PredictionApi;
use crate::constants::{messages, workflow as wf_constants};
use crate::types::FeatureRecord;
use crate::validation::{ValidationResult, is_submittable, validate_all};

/// Result of a `submit` call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another cycle is still running; nothing was done
    InProgress,
    /// Validation failed; no request was issued
    Blocked(ValidationResult),
    /// The cycle ran to completion; snapshot of the final state
    Finished(WorkflowState),
    /// The cycle was abandoned by a reset; its results were dropped
    Superseded,
}

pub struct WorkflowOrchestrator {
    api: PredictionApi,
    recommendations: usize,
    state: Mutex<WorkflowState>,
}

impl WorkflowOrchestrator {
    pub fn new(api: PredictionApi) -> Self {
        Self {
            api,
            recommendations: wf_constants::DEFAULT_RECOMMENDATIONS,
            state: Mutex::new(WorkflowState::new()),
        }
    }

    /// Set how many similar tracks to request, clamped to what the service
    /// honours.
    pub fn with_recommendations(mut self, count: usize) -> Self {
        self.recommendations = count.clamp(
            wf_constants::MIN_RECOMMENDATIONS,
            wf_constants::MAX_RECOMMENDATIONS,
        );
        self
    }

    pub fn recommendations(&self) -> usize {
        self.recommendations
    }

    pub fn api(&self) -> &PredictionApi {
        &self.api
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> WorkflowState {
        self.lock().clone()
    }

    /// Return both stages to idle. Results of an in-flight cycle are dropped.
    pub fn reset(&self) {
        self.lock().reset();
        info!("Workflow reset");
    }

    /// Run one submission cycle for `record`.
    #[instrument(skip_all)]
    pub async fn submit(&self, record: &FeatureRecord) -> SubmitOutcome {
        let (cycle, features) = {
            let mut state = self.lock();
            if state.is_busy() {
                warn!(
                    primary = %state.primary,
                    similar = %state.similar,
                    "Submission rejected, a cycle is in flight"
                );
                return SubmitOutcome::InProgress;
            }

            match record.to_complete() {
                Some(features) if is_submittable(record) => (state.begin_cycle(), features),
                _ => {
                    let errors = validate_all(record);
                    info!(invalid_fields = errors.len(), "Submission blocked by validation");
                    state.block(messages::INCOMPLETE_SUBMISSION, errors.clone());
                    return SubmitOutcome::Blocked(errors);
                }
            }
        };
        info!(cycle, "Submitting prediction");

        let prediction = self.api.predict(&features).await;
        let proceed = match prediction {
            Ok(outcome) => {
                let applied = self.lock().prediction_succeeded(cycle, outcome);
                if applied {
                    info!(cycle, "Prediction ready, loading similar tracks");
                }
                applied
            }
            Err(failure) => {
                let applied = self.lock().prediction_failed(cycle, failure.to_string());
                if !applied {
                    return self.superseded(cycle);
                }
                info!(cycle, category = %failure.category, "Prediction failed");
                return SubmitOutcome::Finished(self.snapshot());
            }
        };
        if !proceed {
            return self.superseded(cycle);
        }

        let similar = self
            .api
            .similar_tracks(&features, self.recommendations)
            .await;
        let applied = match similar {
            Ok(tracks) => {
                let count = tracks.len();
                let applied = self.lock().similar_succeeded(cycle, tracks);
                if applied {
                    info!(cycle, count, "Similar tracks ready");
                }
                applied
            }
            Err(failure) => {
                let applied = self.lock().similar_failed(cycle, failure.to_string());
                if applied {
                    warn!(
                        cycle,
                        category = %failure.category,
                        "Similar tracks failed, prediction kept"
                    );
                }
                applied
            }
        };
        if !applied {
            return self.superseded(cycle);
        }

        SubmitOutcome::Finished(self.snapshot())
    }

    fn superseded(&self, cycle: u64) -> SubmitOutcome {
        info!(cycle, "Dropping results of an abandoned cycle");
        SubmitOutcome::Superseded
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Workflow state lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ResilientHttpClient;
    use crate::client::testing::{ScriptedTransport, Step};
    use crate::types::{FeatureField, PredictionLabel};
    use crate::workflow::state::{PrimaryStage, SimilarStage};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    fn scenario_record() -> FeatureRecord {
        FeatureRecord {
            tempo: Some(120.0),
            energy: Some(0.8),
            danceability: Some(0.7),
            loudness: Some(-5.0),
            valence: Some(0.6),
            acousticness: Some(0.3),
            instrumentalness: Some(0.1),
            liveness: Some(0.2),
            speechiness: Some(0.05),
            duration_ms: Some(200_000.0),
            key: Some(5.0),
            mode: Some(1.0),
            time_signature: Some(4.0),
        }
    }

    fn hit_response() -> Value {
        json!({"prediction": "hit", "confidence": 0.85, "probabilities": {"hit": 0.85, "miss": 0.15}})
    }

    fn five_tracks() -> Value {
        json!({"similar_tracks": [
            {"track_name": "Three", "artist": "C", "similarity_score": 0.81, "features": {"tempo": 121.0}},
            {"track_name": "One", "artist": "A", "similarity_score": 0.95, "features": {}},
            {"track_name": "Five", "artist": "E", "similarity_score": 0.62, "features": {}},
            {"track_name": "Two", "artist": "B", "similarity_score": 0.88, "features": {}},
            {"track_name": "Four", "artist": "D", "similarity_score": 0.70, "features": {}}
        ]})
    }

    fn orchestrator(transport: &Arc<ScriptedTransport>) -> WorkflowOrchestrator {
        WorkflowOrchestrator::new(PredictionApi::new(ResilientHttpClient::new(
            transport.clone(),
        )))
    }

    fn finished(outcome: SubmitOutcome) -> WorkflowState {
        match outcome {
            SubmitOutcome::Finished(state) => state,
            other => panic!("expected a finished cycle, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_prediction_then_ranked_similar_tracks() {
        let transport = ScriptedTransport::new();
        transport.push("/predict", Step::json(200, hit_response()));
        transport.push("/similar", Step::json(200, five_tracks()));

        let state = finished(orchestrator(&transport).submit(&scenario_record()).await);

        let outcome = state.prediction().unwrap();
        assert_eq!(outcome.prediction, PredictionLabel::Hit);
        assert_eq!(outcome.confidence, 0.85);

        let names: Vec<&str> = state.similar_tracks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two", "Three", "Four", "Five"]);
        assert_eq!(state.primary_error(), None);
        assert_eq!(state.similar_error(), None);

        let similar_calls = transport.calls_to("/similar");
        assert_eq!(similar_calls.len(), 1);
        assert_eq!(
            similar_calls[0].body.as_ref().unwrap()["n_recommendations"],
            json!(5)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_tempo_blocks_without_request() {
        let transport = ScriptedTransport::new();
        let orchestrator = orchestrator(&transport);
        let record = scenario_record().with(FeatureField::Tempo, 300.0);

        let outcome = orchestrator.submit(&record).await;

        match outcome {
            SubmitOutcome::Blocked(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(
                    errors.get(&FeatureField::Tempo).map(String::as_str),
                    Some("Tempo must be between 0 and 250")
                );
            }
            other => panic!("expected blocked, got {:?}", other),
        }
        assert!(transport.calls().is_empty());

        let state = orchestrator.snapshot();
        assert_eq!(
            state.primary_error(),
            Some("Please fill in all required fields")
        );
        assert_eq!(state.similar, SimilarStage::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_submit_keeps_prior_results() {
        let transport = ScriptedTransport::new();
        transport.push("/predict", Step::json(200, hit_response()));
        transport.push("/similar", Step::json(200, five_tracks()));
        let orchestrator = orchestrator(&transport);

        let first = finished(orchestrator.submit(&scenario_record()).await);

        let invalid = scenario_record().with(FeatureField::Tempo, 300.0);
        assert!(matches!(
            orchestrator.submit(&invalid).await,
            SubmitOutcome::Blocked(_)
        ));

        let state = orchestrator.snapshot();
        assert_eq!(state.prediction(), first.prediction());
        assert_eq!(state.similar_tracks().len(), 5);
        assert_eq!(state.cycle(), first.cycle());
        assert_eq!(
            state.primary_error(),
            Some("Please fill in all required fields")
        );
        assert_eq!(transport.calls_to("/predict").len(), 1);

        transport.push("/predict", Step::json(200, hit_response()));
        transport.push("/similar", Step::json(200, five_tracks()));
        let again = finished(orchestrator.submit(&scenario_record()).await);
        assert_eq!(again.blocked(), None);
        assert_eq!(again.primary_error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_field_blocks_without_request() {
        let transport = ScriptedTransport::new();
        let mut record = scenario_record();
        record.set(FeatureField::Key, None);

        let outcome = orchestrator(&transport).submit(&record).await;

        match outcome {
            SubmitOutcome::Blocked(errors) => {
                assert_eq!(
                    errors.get(&FeatureField::Key).map(String::as_str),
                    Some("Key is required")
                );
            }
            other => panic!("expected blocked, got {:?}", other),
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_prediction_exhaustion_skips_similar_stage() {
        let transport = ScriptedTransport::new();
        transport.push_many(
            "/predict",
            (0..3).map(|_| Step::json(503, json!({"error": {"code": "MODEL_ERROR", "message": "Model unavailable"}}))),
        );
        transport.push("/similar", Step::json(200, five_tracks()));

        let started = Instant::now();
        let state = finished(orchestrator(&transport).submit(&scenario_record()).await);

        assert!(matches!(state.primary, PrimaryStage::PredictionFailed { .. }));
        assert_eq!(state.primary_error(), Some("Model unavailable"));
        assert_eq!(state.prediction(), None);
        assert_eq!(state.similar, SimilarStage::Idle);

        let calls = transport.calls_to("/predict");
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].at - calls[0].at, Duration::from_millis(1000));
        assert_eq!(calls[2].at - calls[1].at, Duration::from_millis(2000));
        assert!(started.elapsed() >= Duration::from_millis(3000));
        assert!(transport.calls_to("/similar").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_similar_failure_is_isolated() {
        let transport = ScriptedTransport::new();
        transport.push("/predict", Step::json(200, hit_response()));
        transport.push("/similar", Step::json(404, json!({"message": "No similar tracks"})));

        let state = finished(orchestrator(&transport).submit(&scenario_record()).await);

        assert_eq!(state.prediction().unwrap().prediction, PredictionLabel::Hit);
        assert_eq!(state.primary_error(), None);
        assert!(state.similar_tracks().is_empty());
        assert_eq!(state.similar_error(), Some("No similar tracks"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_similar_stage_has_its_own_retry_budget() {
        let transport = ScriptedTransport::new();
        transport.push("/predict", Step::NoResponse);
        transport.push("/predict", Step::NoResponse);
        transport.push("/predict", Step::json(200, hit_response()));
        transport.push("/similar", Step::json(503, json!({})));
        transport.push("/similar", Step::json(503, json!({})));
        transport.push("/similar", Step::json(200, five_tracks()));

        let state = finished(orchestrator(&transport).submit(&scenario_record()).await);

        assert!(state.prediction().is_some());
        assert_eq!(state.similar_tracks().len(), 5);
        assert_eq!(transport.calls_to("/predict").len(), 3);
        assert_eq!(transport.calls_to("/similar").len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prediction_visible_while_similar_loading() {
        let transport = ScriptedTransport::new();
        transport.push("/predict", Step::json(200, hit_response()));
        transport.push(
            "/similar",
            Step::json_after(Duration::from_secs(2), 200, five_tracks()),
        );
        let orchestrator = orchestrator(&transport);
        let record = scenario_record();

        let (outcome, midway) = tokio::join!(orchestrator.submit(&record), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            orchestrator.snapshot()
        });

        assert!(midway.prediction().is_some());
        assert_eq!(midway.similar, SimilarStage::Loading);
        assert_eq!(finished(outcome).similar_tracks().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmission_resets_both_stages() {
        let transport = ScriptedTransport::new();
        transport.push("/predict", Step::json(200, hit_response()));
        transport.push("/similar", Step::json(400, json!({})));
        let orchestrator = orchestrator(&transport);

        let first = finished(orchestrator.submit(&scenario_record()).await);
        assert!(first.similar_error().is_some());

        transport.push("/predict", Step::json(422, json!({"error": {"message": "Invalid features"}})));
        let second = finished(orchestrator.submit(&scenario_record()).await);

        assert_eq!(second.primary_error(), Some("Invalid features"));
        assert_eq!(second.prediction(), None);
        assert_eq!(second.similar_error(), None);
        assert_eq!(second.similar, SimilarStage::Idle);
        assert!(second.cycle() > first.cycle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_rejected_while_in_flight() {
        let transport = ScriptedTransport::new();
        transport.push(
            "/predict",
            Step::json_after(Duration::from_secs(5), 200, hit_response()),
        );
        transport.push("/similar", Step::json(200, five_tracks()));
        let orchestrator = orchestrator(&transport);
        let record = scenario_record();

        let (first, second) = tokio::join!(orchestrator.submit(&record), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            orchestrator.submit(&record).await
        });

        assert_eq!(second, SubmitOutcome::InProgress);
        assert!(finished(first).prediction().is_some());
        assert_eq!(transport.calls_to("/predict").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_drops_in_flight_results() {
        let transport = ScriptedTransport::new();
        transport.push(
            "/predict",
            Step::json_after(Duration::from_secs(5), 200, hit_response()),
        );
        let orchestrator = orchestrator(&transport);
        let record = scenario_record();

        let (outcome, _) = tokio::join!(orchestrator.submit(&record), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            orchestrator.reset();
        });

        assert_eq!(outcome, SubmitOutcome::Superseded);
        let state = orchestrator.snapshot();
        assert_eq!(state.primary, PrimaryStage::Idle);
        assert_eq!(state.similar, SimilarStage::Idle);
        assert!(transport.calls_to("/similar").is_empty());
    }

    #[test]
    fn test_recommendations_clamped() {
        let transport = ScriptedTransport::new();
        assert_eq!(orchestrator(&transport).recommendations(), 5);
        assert_eq!(
            orchestrator(&transport).with_recommendations(50).recommendations(),
            10
        );
        assert_eq!(
            orchestrator(&transport).with_recommendations(1).recommendations(),
            3
        );
    }
}
