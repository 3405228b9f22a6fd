use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hitlens::cli::commands::{self, FeatureArgs};
use hitlens::cli::{CommandContext, OutputFormat};
use hitlens::config::ConfigFormat;

#[derive(Parser)]
#[command(name = "hitlens")]
#[command(version, about = "Hit/miss predictions and similar tracks from audio features")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Service base URL (overrides config and HITLENS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict hit/miss for a track and list similar tracks
    Predict {
        #[command(flatten)]
        features: FeatureArgs,
    },

    /// Check feature values without contacting the service
    Validate {
        #[command(flatten)]
        features: FeatureArgs,
    },

    /// Show dataset statistics
    Eda {
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check that the service is reachable
    Health,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'f', long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Show configuration file paths
    Path,
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mhitlens encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api_url = cli.api_url.as_deref();

    match cli.command {
        Commands::Predict { features } => {
            let ctx = CommandContext::load(api_url)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::predict::run(&ctx, &features))?;
        }
        Commands::Validate { features } => {
            commands::validate::run(&features)?;
        }
        Commands::Eda { format } => {
            let ctx = CommandContext::load(api_url)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::eda::run(&ctx, format))?;
        }
        Commands::Health => {
            let ctx = CommandContext::load(api_url)?;
            let rt = Runtime::new()?;
            rt.block_on(commands::health::run(&ctx))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let ctx = CommandContext::load(api_url)?;
                commands::config::show(&ctx, format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
        },
    }

    Ok(())
}
