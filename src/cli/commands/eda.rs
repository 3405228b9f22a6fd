//! EDA Command
//!
//! Fetch the dataset summary from the service.

use crate::cli::OutputFormat;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn run(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let api = ctx.api()?;
    let eda = api.eda_data().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&eda)?),
        OutputFormat::Text => {
            let output = Output::new();
            output.header("Dataset Overview");
            output.eda_panel(&eda);
        }
    }

    Ok(())
}
