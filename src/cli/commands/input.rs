//! Feature Input
//!
//! Builds a partial `FeatureRecord` from an optional JSON file and per-field
//! flags. Flags win over file values; anything left out stays absent so the
//! validator can report it.

use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::types::{FeatureField, FeatureRecord, HitlensError, Result};

#[derive(Debug, Clone, Default, Args)]
pub struct FeatureArgs {
    /// JSON file with feature values, e.g. {"tempo": 120, "energy": 0.8}
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Tempo in BPM (0-250)
    #[arg(long)]
    pub tempo: Option<f64>,
    /// Energy (0-1)
    #[arg(long)]
    pub energy: Option<f64>,
    /// Danceability (0-1)
    #[arg(long)]
    pub danceability: Option<f64>,
    /// Loudness in dB (-60-0)
    #[arg(long, allow_negative_numbers = true)]
    pub loudness: Option<f64>,
    /// Valence (0-1)
    #[arg(long)]
    pub valence: Option<f64>,
    /// Acousticness (0-1)
    #[arg(long)]
    pub acousticness: Option<f64>,
    /// Instrumentalness (0-1)
    #[arg(long)]
    pub instrumentalness: Option<f64>,
    /// Liveness (0-1)
    #[arg(long)]
    pub liveness: Option<f64>,
    /// Speechiness (0-1)
    #[arg(long)]
    pub speechiness: Option<f64>,
    /// Duration in milliseconds (0-600000)
    #[arg(long)]
    pub duration_ms: Option<f64>,
    /// Musical key (0-11)
    #[arg(long)]
    pub key: Option<f64>,
    /// Mode, 0 = minor, 1 = major
    #[arg(long)]
    pub mode: Option<f64>,
    /// Time signature (3-7)
    #[arg(long)]
    pub time_signature: Option<f64>,
}

impl FeatureArgs {
    /// Record from the input file (if any) with flag values laid over it
    pub fn to_record(&self) -> Result<FeatureRecord> {
        let mut record = match &self.input {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                serde_json::from_str::<FeatureRecord>(&content).map_err(|e| {
                    HitlensError::Config(format!(
                        "Invalid feature file {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
            None => FeatureRecord::new(),
        };
        record.merge(&self.flag_record());
        Ok(record)
    }

    fn flag_record(&self) -> FeatureRecord {
        let flags = [
            (FeatureField::Tempo, self.tempo),
            (FeatureField::Energy, self.energy),
            (FeatureField::Danceability, self.danceability),
            (FeatureField::Loudness, self.loudness),
            (FeatureField::Valence, self.valence),
            (FeatureField::Acousticness, self.acousticness),
            (FeatureField::Instrumentalness, self.instrumentalness),
            (FeatureField::Liveness, self.liveness),
            (FeatureField::Speechiness, self.speechiness),
            (FeatureField::DurationMs, self.duration_ms),
            (FeatureField::Key, self.key),
            (FeatureField::Mode, self.mode),
            (FeatureField::TimeSignature, self.time_signature),
        ];

        let mut record = FeatureRecord::new();
        for (field, value) in flags {
            record.set(field, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_only() {
        let args = FeatureArgs {
            tempo: Some(128.0),
            loudness: Some(-7.5),
            ..Default::default()
        };
        let record = args.to_record().unwrap();
        assert_eq!(record.tempo, Some(128.0));
        assert_eq!(record.loudness, Some(-7.5));
        assert_eq!(record.missing_fields().len(), 11);
    }

    #[test]
    fn test_flags_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("track.json");
        fs::write(&path, r#"{"tempo": 90, "energy": 0.4, "key": 2}"#).unwrap();

        let args = FeatureArgs {
            input: Some(path),
            tempo: Some(140.0),
            ..Default::default()
        };
        let record = args.to_record().unwrap();
        assert_eq!(record.tempo, Some(140.0));
        assert_eq!(record.energy, Some(0.4));
        assert_eq!(record.key, Some(2.0));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("track.json");
        fs::write(&path, r#"{"tempo": "fast"}"#).unwrap();

        let args = FeatureArgs {
            input: Some(path),
            ..Default::default()
        };
        assert!(matches!(args.to_record(), Err(HitlensError::Config(_))));
    }
}
