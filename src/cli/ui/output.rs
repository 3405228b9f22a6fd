use console::style;

use crate::types::{EdaData, FeatureField, PredictionLabel, PredictionOutcome, SimilarTrack};
use crate::validation::ValidationResult;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn line(&self, message: &str) {
        println!("  {}", message);
    }

    // =========================================================================
    // Panels
    // =========================================================================

    /// One line per field: ✓ or the field's error
    pub fn field_report(&self, errors: &ValidationResult) {
        self.section("Features");
        for field in FeatureField::ALL {
            match errors.get(&field) {
                Some(message) => println!("  {} {:<18} {}", style("✗").red(), field.name(), message),
                None => println!("  {} {}", style("✓").green(), field.name()),
            }
        }
    }

    pub fn prediction_panel(&self, outcome: &PredictionOutcome) {
        self.section("Prediction");
        let label = match outcome.prediction {
            PredictionLabel::Hit => style(prediction_headline(outcome)).green().bold(),
            PredictionLabel::Miss => style(prediction_headline(outcome)).red().bold(),
        };
        println!("  {}", label);
        self.line(&probability_line(outcome));
    }

    /// Similar tracks, or the stage's own error
    pub fn similar_panel(&self, tracks: &[SimilarTrack], error: Option<&str>) {
        self.section("Similar Tracks");
        if let Some(message) = error {
            self.warning(message);
            return;
        }
        if tracks.is_empty() {
            self.line("No similar tracks found");
            return;
        }
        for (rank, track) in tracks.iter().enumerate() {
            self.line(&similar_track_line(rank + 1, track));
        }
    }

    pub fn eda_panel(&self, eda: &EdaData) {
        self.section("Hit / Miss Distribution");
        self.line(&format!(
            "hit: {}   miss: {}",
            eda.hit_miss_distribution.hit, eda.hit_miss_distribution.miss
        ));

        self.section("Summary Statistics");
        println!(
            "  {:<18} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "feature", "mean", "std", "min", "median", "max"
        );
        for (feature, stats) in &eda.summary_statistics {
            println!(
                "  {:<18} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                feature, stats.mean, stats.std, stats.min, stats.q50, stats.max
            );
        }

        if !eda.correlations.features.is_empty() {
            self.section("Correlations");
            self.line(&format!(
                "{} features, {}×{} matrix",
                eda.correlations.features.len(),
                eda.correlations.matrix.len(),
                eda.correlations.matrix.first().map_or(0, Vec::len)
            ));
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn prediction_headline(outcome: &PredictionOutcome) -> String {
    format!(
        "{} ({} confidence)",
        outcome.prediction.to_string().to_uppercase(),
        percent(outcome.confidence)
    )
}

pub fn probability_line(outcome: &PredictionOutcome) -> String {
    format!(
        "hit {}   miss {}",
        percent(outcome.probabilities.hit),
        percent(outcome.probabilities.miss)
    )
}

pub fn similar_track_line(rank: usize, track: &SimilarTrack) -> String {
    format!(
        "{:>2}. {} by {} ({} match)",
        rank,
        track.name,
        track.artist,
        percent(track.similarity)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeatureRecord, Probabilities};

    #[test]
    fn test_prediction_lines() {
        let outcome = PredictionOutcome {
            prediction: PredictionLabel::Hit,
            confidence: 0.85,
            probabilities: Probabilities {
                hit: 0.85,
                miss: 0.15,
            },
        };
        assert_eq!(prediction_headline(&outcome), "HIT (85.0% confidence)");
        assert_eq!(probability_line(&outcome), "hit 85.0%   miss 15.0%");
    }

    #[test]
    fn test_similar_track_line() {
        let track = SimilarTrack {
            name: "Blinding Lights".to_string(),
            artist: "The Weeknd".to_string(),
            similarity: 0.923,
            features: FeatureRecord::default(),
        };
        assert_eq!(
            similar_track_line(1, &track),
            " 1. Blinding Lights by The Weeknd (92.3% match)"
        );
    }
}
