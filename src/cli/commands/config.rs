//! Config Command
//!
//! Inspect hitlens configuration.
//!
//! Usage:
//!   hitlens config show [-f json|toml]
//!   hitlens config path

use console::style;

use crate::cli::util::CommandContext;
use crate::config::{ConfigFormat, ConfigLoader};
use crate::constants::network::BASE_URL_ENV;
use crate::types::Result;

/// Show the effective configuration (all sources merged)
pub fn show(ctx: &CommandContext, format: ConfigFormat) -> Result<()> {
    println!("{}", ConfigLoader::render(&ctx.config, format)?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    println!("Configuration paths:");
    println!();

    for (scope, path, exists) in ConfigLoader::describe_paths() {
        let mark = if exists {
            style("✓").green()
        } else {
            style("✗").dim()
        };
        match path {
            Some(path) => println!("  {:<8} {} {}", format!("{}:", scope), mark, path.display()),
            None => println!("  {:<8} (not available)", format!("{}:", scope)),
        }
    }

    let env_state = if std::env::var_os(BASE_URL_ENV).is_some() {
        "set"
    } else {
        "unset"
    };
    println!("  {:<8} {} ({})", "Env:", BASE_URL_ENV, env_state);
    Ok(())
}
