//! Service Payloads
//!
//! Request and response shapes for the prediction service endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::features::{FeatureRecord, TrackFeatures};
use crate::constants::workflow::PROBABILITY_TOLERANCE;

// =============================================================================
// Prediction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionLabel {
    Hit,
    Miss,
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Miss => write!(f, "miss"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub hit: f64,
    pub miss: f64,
}

/// Response of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub prediction: PredictionLabel,
    pub confidence: f64,
    pub probabilities: Probabilities,
}

impl PredictionOutcome {
    /// Check confidence bounds and that the probability pair sums to one.
    pub fn check(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence {} outside [0, 1]", self.confidence));
        }
        let sum = self.probabilities.hit + self.probabilities.miss;
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(format!(
                "probabilities hit={} miss={} sum to {}",
                self.probabilities.hit, self.probabilities.miss, sum
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Similar Tracks
// =============================================================================

/// Body of `POST /similar`
#[derive(Debug, Clone, Serialize)]
pub struct SimilarTracksRequest {
    pub features: TrackFeatures,
    pub n_recommendations: usize,
}

/// One recommended track, most similar first in a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTrack {
    #[serde(rename = "track_name")]
    pub name: String,
    pub artist: String,
    #[serde(rename = "similarity_score")]
    pub similarity: f64,
    #[serde(default)]
    pub features: FeatureRecord,
}

/// Response of `POST /similar`
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarTracksResponse {
    pub similar_tracks: Vec<SimilarTrack>,
}

impl SimilarTracksResponse {
    /// Reject out-of-range similarity scores, then rank most similar first.
    ///
    /// Cosine similarity carries float noise, so scores within
    /// `PROBABILITY_TOLERANCE` of [0, 1] are clamped. The sort is stable so
    /// equal scores keep the service's order.
    pub fn into_ranked(self) -> Result<Vec<SimilarTrack>, String> {
        let mut tracks = self.similar_tracks;
        for track in &mut tracks {
            if !(-PROBABILITY_TOLERANCE..=1.0 + PROBABILITY_TOLERANCE).contains(&track.similarity) {
                return Err(format!(
                    "similarity {} for '{}' outside [0, 1]",
                    track.similarity, track.name
                ));
            }
            track.similarity = track.similarity.clamp(0.0, 1.0);
        }
        tracks.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(tracks)
    }
}

// =============================================================================
// EDA Data
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub bins: Vec<f64>,
    pub counts: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlations {
    pub features: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitMissDistribution {
    pub hit: f64,
    pub miss: f64,
}

/// Response of `GET /eda-data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdaData {
    pub feature_distributions: BTreeMap<String, Distribution>,
    pub correlations: Correlations,
    pub summary_statistics: BTreeMap<String, SummaryStatistics>,
    pub hit_miss_distribution: HitMissDistribution,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
