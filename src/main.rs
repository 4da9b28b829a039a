//! Grove CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::{GroveConfig, Overrides};

#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "Structure and dependency diagrams for Python sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./grove.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a file or directory and summarise what was found
    Analyze {
        path: PathBuf,

        /// Print the full corpus as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the layout engine and print device geometry
    Layout {
        path: PathBuf,

        /// Print the render scene as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the source preview for a symbol id or diagram key
    Source { path: PathBuf, id: String },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("grove={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = GroveConfig::load(cli.config.as_deref())?;
    config.apply(&cli.overrides);

    match cli.command {
        Commands::Analyze { path, json } => commands::analyze(&path, &config, json),
        Commands::Layout { path, json } => commands::layout(&path, &config, json),
        Commands::Source { path, id } => commands::source(&path, &id, &config),
        Commands::Version => {
            println!("Grove v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
