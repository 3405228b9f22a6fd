pub mod error;
pub mod features;
pub mod prediction;

pub use error::{
    AttemptFailure, FailureCategory, FailureDiagnostics, HitlensError, RequestFailure, Result,
    classify_failure,
};
pub use features::{FeatureField, FeatureRange, FeatureRecord, TrackFeatures};
pub use prediction::{
    Correlations, Distribution, EdaData, HealthStatus, HitMissDistribution, PredictionLabel,
    PredictionOutcome, Probabilities, SimilarTrack, SimilarTracksRequest, SimilarTracksResponse,
    SummaryStatistics,
};
