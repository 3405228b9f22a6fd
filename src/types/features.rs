//! Track Audio Features
//!
//! The fixed 13-field feature set, its per-field domain ranges, the partial
//! record used while values are being entered, and the complete record sent
//! to the service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed numeric domain for a single feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
    /// Human-readable label used in validation messages
    pub label: &'static str,
}

impl FeatureRange {
    const fn new(min: f64, max: f64, label: &'static str) -> Self {
        Self { min, max, label }
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One of the 13 audio feature fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureField {
    Tempo,
    Energy,
    Danceability,
    Loudness,
    Valence,
    Acousticness,
    Instrumentalness,
    Liveness,
    Speechiness,
    DurationMs,
    Key,
    Mode,
    TimeSignature,
}

impl FeatureField {
    /// All fields, in form order
    pub const ALL: [FeatureField; 13] = [
        FeatureField::Tempo,
        FeatureField::Energy,
        FeatureField::Danceability,
        FeatureField::Loudness,
        FeatureField::Valence,
        FeatureField::Acousticness,
        FeatureField::Instrumentalness,
        FeatureField::Liveness,
        FeatureField::Speechiness,
        FeatureField::DurationMs,
        FeatureField::Key,
        FeatureField::Mode,
        FeatureField::TimeSignature,
    ];

    /// Wire name (JSON key)
    pub fn name(self) -> &'static str {
        match self {
            Self::Tempo => "tempo",
            Self::Energy => "energy",
            Self::Danceability => "danceability",
            Self::Loudness => "loudness",
            Self::Valence => "valence",
            Self::Acousticness => "acousticness",
            Self::Instrumentalness => "instrumentalness",
            Self::Liveness => "liveness",
            Self::Speechiness => "speechiness",
            Self::DurationMs => "duration_ms",
            Self::Key => "key",
            Self::Mode => "mode",
            Self::TimeSignature => "time_signature",
        }
    }

    pub fn range(self) -> FeatureRange {
        match self {
            Self::Tempo => FeatureRange::new(0.0, 250.0, "Tempo"),
            Self::Energy => FeatureRange::new(0.0, 1.0, "Energy"),
            Self::Danceability => FeatureRange::new(0.0, 1.0, "Danceability"),
            Self::Loudness => FeatureRange::new(-60.0, 0.0, "Loudness"),
            Self::Valence => FeatureRange::new(0.0, 1.0, "Valence"),
            Self::Acousticness => FeatureRange::new(0.0, 1.0, "Acousticness"),
            Self::Instrumentalness => FeatureRange::new(0.0, 1.0, "Instrumentalness"),
            Self::Liveness => FeatureRange::new(0.0, 1.0, "Liveness"),
            Self::Speechiness => FeatureRange::new(0.0, 1.0, "Speechiness"),
            Self::DurationMs => FeatureRange::new(0.0, 600_000.0, "Duration"),
            Self::Key => FeatureRange::new(0.0, 11.0, "Key"),
            Self::Mode => FeatureRange::new(0.0, 1.0, "Mode"),
            Self::TimeSignature => FeatureRange::new(3.0, 7.0, "Time Signature"),
        }
    }

    pub fn label(self) -> &'static str {
        self.range().label
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for FeatureField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == lower)
            .ok_or_else(|| format!("Unknown feature field: {}", s))
    }
}

/// Partial feature record, as entered. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danceability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loudness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acousticness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumentalness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liveness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speechiness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_signature: Option<f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FeatureField) -> Option<f64> {
        *self.slot(field)
    }

    pub fn set(&mut self, field: FeatureField, value: Option<f64>) {
        *self.slot_mut(field) = value;
    }

    /// Builder-style setter
    pub fn with(mut self, field: FeatureField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Overlay every present field of `other` onto this record
    pub fn merge(&mut self, other: &FeatureRecord) {
        for field in FeatureField::ALL {
            if let Some(value) = other.get(field) {
                self.set(field, Some(value));
            }
        }
    }

    /// Fields with no value
    pub fn missing_fields(&self) -> Vec<FeatureField> {
        FeatureField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        FeatureField::ALL
            .into_iter()
            .all(|field| self.get(field).is_some())
    }

    /// Convert into a complete record, or `None` if any field is absent.
    ///
    /// Range checks are not applied here; gate on validation first.
    pub fn to_complete(&self) -> Option<TrackFeatures> {
        Some(TrackFeatures {
            tempo: self.tempo?,
            energy: self.energy?,
            danceability: self.danceability?,
            loudness: self.loudness?,
            valence: self.valence?,
            acousticness: self.acousticness?,
            instrumentalness: self.instrumentalness?,
            liveness: self.liveness?,
            speechiness: self.speechiness?,
            duration_ms: self.duration_ms?,
            key: self.key?,
            mode: self.mode?,
            time_signature: self.time_signature?,
        })
    }

    fn slot(&self, field: FeatureField) -> &Option<f64> {
        match field {
            FeatureField::Tempo => &self.tempo,
            FeatureField::Energy => &self.energy,
            FeatureField::Danceability => &self.danceability,
            FeatureField::Loudness => &self.loudness,
            FeatureField::Valence => &self.valence,
            FeatureField::Acousticness => &self.acousticness,
            FeatureField::Instrumentalness => &self.instrumentalness,
            FeatureField::Liveness => &self.liveness,
            FeatureField::Speechiness => &self.speechiness,
            FeatureField::DurationMs => &self.duration_ms,
            FeatureField::Key => &self.key,
            FeatureField::Mode => &self.mode,
            FeatureField::TimeSignature => &self.time_signature,
        }
    }

    fn slot_mut(&mut self, field: FeatureField) -> &mut Option<f64> {
        match field {
            FeatureField::Tempo => &mut self.tempo,
            FeatureField::Energy => &mut self.energy,
            FeatureField::Danceability => &mut self.danceability,
            FeatureField::Loudness => &mut self.loudness,
            FeatureField::Valence => &mut self.valence,
            FeatureField::Acousticness => &mut self.acousticness,
            FeatureField::Instrumentalness => &mut self.instrumentalness,
            FeatureField::Liveness => &mut self.liveness,
            FeatureField::Speechiness => &mut self.speechiness,
            FeatureField::DurationMs => &mut self.duration_ms,
            FeatureField::Key => &mut self.key,
            FeatureField::Mode => &mut self.mode,
            FeatureField::TimeSignature => &mut self.time_signature,
        }
    }
}

/// Complete feature record, the body of `POST /predict`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackFeatures {
    pub tempo: f64,
    pub energy: f64,
    pub danceability: f64,
    pub loudness: f64,
    pub valence: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub speechiness: f64,
    pub duration_ms: f64,
    pub key: f64,
    pub mode: f64,
    pub time_signature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip_through_from_str() {
        for field in FeatureField::ALL {
            assert_eq!(field.name().parse::<FeatureField>().unwrap(), field);
        }
        assert!("bpm".parse::<FeatureField>().is_err());
    }

    #[test]
    fn test_time_signature_range() {
        let range = FeatureField::TimeSignature.range();
        assert!(!range.contains(2.0));
        assert!(range.contains(3.0));
        assert!(range.contains(7.0));
        assert!(!range.contains(7.5));
    }

    #[test]
    fn test_partial_record_serializes_only_present_fields() {
        let record = FeatureRecord::new()
            .with(FeatureField::Tempo, 120.0)
            .with(FeatureField::DurationMs, 200_000.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"tempo": 120.0, "duration_ms": 200000.0}));
    }

    #[test]
    fn test_to_complete_requires_every_field() {
        let mut record = FeatureRecord::new();
        for field in FeatureField::ALL {
            assert!(record.to_complete().is_none());
            record.set(field, Some(1.0));
        }
        assert!(record.is_complete());
        assert!(record.to_complete().is_some());
    }

    #[test]
    fn test_merge_overlays_present_values() {
        let mut base = FeatureRecord::new()
            .with(FeatureField::Key, 5.0)
            .with(FeatureField::Mode, 1.0);
        let overlay = FeatureRecord::new().with(FeatureField::Key, 7.0);
        base.merge(&overlay);
        assert_eq!(base.key, Some(7.0));
        assert_eq!(base.mode, Some(1.0));
        assert_eq!(base.missing_fields().len(), 11);
    }
}
