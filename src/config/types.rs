//! Configuration Types
//!
//! Everything a user may configure. Timeouts and the retry budget are fixed
//! constants, not settings.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{network as net_constants, workflow as wf_constants};
use crate::types::{HitlensError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prediction service settings
    pub api: ApiConfig,

    /// Submission workflow settings
    pub workflow: WorkflowConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `HitlensError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            HitlensError::Config(format!(
                "api.base_url '{}' is not a valid URL: {}",
                self.api.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HitlensError::Config(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        let range = wf_constants::MIN_RECOMMENDATIONS..=wf_constants::MAX_RECOMMENDATIONS;
        if !range.contains(&self.workflow.recommendations) {
            return Err(HitlensError::Config(format!(
                "workflow.recommendations must be between {} and {}, got {}",
                wf_constants::MIN_RECOMMENDATIONS,
                wf_constants::MAX_RECOMMENDATIONS,
                self.workflow.recommendations
            )));
        }

        Ok(())
    }
}

// =============================================================================
// API Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service base address; endpoint paths are appended to it
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: net_constants::DEFAULT_BASE_URL.to_string(),
        }
    }
}

// =============================================================================
// Workflow Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Similar tracks requested after a successful prediction
    pub recommendations: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            recommendations: wf_constants::DEFAULT_RECOMMENDATIONS,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.workflow.recommendations, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_recommendations_range() {
        let mut config = Config::default();
        config.workflow.recommendations = 2;
        assert!(matches!(config.validate(), Err(HitlensError::Config(_))));

        config.workflow.recommendations = 10;
        assert!(config.validate().is_ok());

        config.workflow.recommendations = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = Config::default();
        config.api.base_url = "localhost:5000".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://example.com/api".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://tracks.example.com/api".to_string();
        assert!(config.validate().is_ok());
    }
}
