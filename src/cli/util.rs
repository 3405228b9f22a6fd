//! CLI Common Utilities
//!
//! Shared context for command handlers: resolved configuration and the
//! service client built from it.

use tracing::debug;

use crate::client::PredictionApi;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;
use crate::workflow::WorkflowOrchestrator;

/// Command execution context
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Loaded configuration, CLI overrides applied
    pub config: Config,
}

impl CommandContext {
    /// Load configuration and apply `--api-url`, which wins over every
    /// other source.
    pub fn load(api_url: Option<&str>) -> Result<Self> {
        let config = ConfigLoader::load()?;
        Self::from_config(config, api_url)
    }

    pub fn from_config(mut config: Config, api_url: Option<&str>) -> Result<Self> {
        if let Some(url) = api_url {
            debug!(url, "API base URL overridden from command line");
            config.api.base_url = url.to_string();
            config.validate()?;
        }
        Ok(Self { config })
    }

    pub fn api(&self) -> Result<PredictionApi> {
        PredictionApi::connect(&self.config.api.base_url)
    }

    pub fn orchestrator(&self) -> Result<WorkflowOrchestrator> {
        Ok(WorkflowOrchestrator::new(self.api()?)
            .with_recommendations(self.config.workflow.recommendations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HitlensError;

    #[test]
    fn test_api_url_override() {
        let ctx =
            CommandContext::from_config(Config::default(), Some("http://10.0.0.5:5000/api")).unwrap();
        assert_eq!(ctx.config.api.base_url, "http://10.0.0.5:5000/api");
        assert!(ctx.api().is_ok());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = CommandContext::from_config(Config::default(), Some("not a url")).unwrap_err();
        assert!(matches!(err, HitlensError::Config(_)));
    }

    #[test]
    fn test_orchestrator_uses_configured_recommendations() {
        let mut config = Config::default();
        config.workflow.recommendations = 8;
        let ctx = CommandContext::from_config(config, None).unwrap();
        assert_eq!(ctx.orchestrator().unwrap().recommendations(), 8);
    }
}
