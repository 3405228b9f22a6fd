//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/hitlens/config.toml)
//! 3. Project config (./hitlens.toml)
//! 4. Environment (`HITLENS_API_URL` only, mapped to `api.base_url`)

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::constants::network::BASE_URL_ENV;
use crate::types::{HitlensError, Result};

const APP_DIR: &str = "hitlens";
const PROJECT_CONFIG_FILE: &str = "hitlens.toml";

/// Serialization format for `config show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let figment = Self::figment(
            Self::global_config_path().as_deref(),
            &Self::project_config_path(),
        );
        Self::extract(figment)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));
        Self::extract(figment)
    }

    /// The layered figment; missing files are skipped
    pub fn figment(global: Option<&Path>, project: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        figment.merge(Self::env_provider())
    }

    /// Only the base address may come from the environment
    fn env_provider() -> Env {
        Env::raw()
            .only(&[BASE_URL_ENV])
            .map(|_| "api.base_url".into())
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| HitlensError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/hitlens/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var_os("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().join(".config")))
            .map(|p| p.join(APP_DIR))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Describe where configuration is read from
    pub fn describe_paths() -> Vec<(&'static str, Option<PathBuf>, bool)> {
        let global = Self::global_config_path();
        let global_exists = global.as_ref().is_some_and(|p| p.exists());
        let project = Self::project_config_path();
        let project_exists = project.exists();

        vec![
            ("Global", global, global_exists),
            ("Project", Some(project), project_exists),
        ]
    }

    /// Render the effective configuration
    pub fn render(config: &Config, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| HitlensError::Config(e.to_string()))
            }
        }
    }
}
