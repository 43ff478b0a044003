//! Folio CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize config & starter corpus
//! - `serve`   — Start the HTTP gateway
//! - `doctor`  — Diagnose configuration and corpus health
//! - `prompt`  — Render the system prompt for inspection

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio — portfolio assistant chat gateway",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and a starter corpus
    Onboard,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Diagnose configuration and corpus health
    Doctor,

    /// Render the system prompt and print it
    Prompt {
        /// Locale to render for (defaults to the configured locale)
        #[arg(short, long)]
        locale: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Prompt { locale } => commands::prompt::run(locale).await?,
    }

    Ok(())
}
