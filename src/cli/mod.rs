pub mod commands;
pub mod ui;
pub mod util;

pub use util::CommandContext;

/// Output format for commands with machine-readable output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
