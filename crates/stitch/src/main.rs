//! stitch CLI - fragment-based static site builder.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "stitch")]
#[command(about = "Build a static site from pages and shared layout fragments")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (TOML, or JSON by extension)
    #[arg(short, long, default_value = "stitch.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a source tree and config in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the whole site
    Build {
        /// Output directory (defaults to config or "dest")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minify the compiled stylesheet
        #[arg(long)]
        minify: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build { output, minify } => {
            commands::build::run(&cli.config, output, minify).await?;
        }
    }

    Ok(())
}
