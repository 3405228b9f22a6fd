//! Health Command
//!
//! Single-attempt reachability check.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{HitlensError, Result};

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let output = Output::new();
    let base_url = &ctx.config.api.base_url;

    if ctx.api()?.health_check().await? {
        output.success(&format!("Service healthy at {}", base_url));
        Ok(())
    } else {
        Err(HitlensError::Http(format!(
            "Service unavailable at {}",
            base_url
        )))
    }
}
