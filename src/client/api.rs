//! Prediction Service API
//!
//! Typed endpoints of the track-statistics service on top of the resilient
//! client. Every call gets its own retry budget; response bodies are decoded
//! and sanity-checked here so callers only see well-formed payloads.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::resilient::ResilientHttpClient;
use super::transport::{ReqwestTransport, RequestSpec};
use crate::constants::{endpoints, network as net_constants};
use crate::types::{
    EdaData, HealthStatus, PredictionOutcome, RequestFailure, Result, SimilarTrack,
    SimilarTracksRequest, SimilarTracksResponse, TrackFeatures,
};

#[derive(Debug)]
pub struct PredictionApi {
    client: ResilientHttpClient,
}

impl PredictionApi {
    pub fn new(client: ResilientHttpClient) -> Self {
        Self { client }
    }

    /// Build against a live service at `base_url`
    pub fn connect(base_url: &str) -> Result<Self> {
        let transport = ReqwestTransport::new(
            base_url,
            Duration::from_secs(net_constants::REQUEST_TIMEOUT_SECS),
        )?;
        debug!(base_url = %transport.base_url(), "Prediction API configured");
        Ok(Self::new(ResilientHttpClient::new(Arc::new(transport))))
    }

    /// `POST /predict`
    #[instrument(skip_all)]
    pub async fn predict(
        &self,
        features: &TrackFeatures,
    ) -> std::result::Result<PredictionOutcome, RequestFailure> {
        let request = RequestSpec::post_json(endpoints::PREDICT, features)?;
        let response = self.client.execute(&request).await?;
        let operation = response.operation().to_string();
        let attempts = response.attempts;
        let outcome: PredictionOutcome = response.decode()?;

        outcome
            .check()
            .map_err(|detail| RequestFailure::decode(operation, attempts, detail))?;

        info!(
            prediction = %outcome.prediction,
            confidence = outcome.confidence,
            attempts,
            "Prediction received"
        );
        Ok(outcome)
    }

    /// `POST /similar`, ranked most similar first
    #[instrument(skip(self, features))]
    pub async fn similar_tracks(
        &self,
        features: &TrackFeatures,
        n_recommendations: usize,
    ) -> std::result::Result<Vec<SimilarTrack>, RequestFailure> {
        let request = SimilarTracksRequest {
            features: *features,
            n_recommendations,
        };
        let response = self
            .client
            .execute(&RequestSpec::post_json(endpoints::SIMILAR, &request)?)
            .await?;
        let operation = response.operation().to_string();
        let attempts = response.attempts;
        let decoded: SimilarTracksResponse = response.decode()?;

        let tracks = decoded
            .into_ranked()
            .map_err(|detail| RequestFailure::decode(operation, attempts, detail))?;

        info!(count = tracks.len(), attempts, "Similar tracks received");
        Ok(tracks)
    }

    /// `GET /eda-data`
    #[instrument(skip_all)]
    pub async fn eda_data(&self) -> std::result::Result<EdaData, RequestFailure> {
        let response = self
            .client
            .execute(&RequestSpec::get(endpoints::EDA_DATA))
            .await?;
        response.decode()
    }

    /// `GET /health`, single attempt. Any failure reports `false`.
    pub async fn health_check(&self) -> Result<bool> {
        let response = match self
            .client
            .execute_once(&RequestSpec::get(endpoints::HEALTH))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(category = %e.category, "Health check failed: {}", e);
                return Ok(false);
            }
        };

        match response.decode::<HealthStatus>() {
            Ok(health) if health.status == "healthy" => {
                info!(
                    message = health.message.as_deref().unwrap_or(""),
                    "Service is healthy"
                );
                Ok(true)
            }
            Ok(health) => {
                warn!(status = %health.status, "Service reported unhealthy status");
                Ok(false)
            }
            Err(e) => {
                warn!("Health check returned an unreadable body: {:?}", e.diagnostics());
                Ok(false)
            }
        }
    }
}
