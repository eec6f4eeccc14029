//! Tessera CLI - assemble HTML documents from reusable markup fragments.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Assemble HTML documents from reusable markup fragments")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to tessera.toml config file
    #[arg(short, long, default_value = "tessera.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a config file, layout template and example fragments
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the builder server
    Serve {
        /// Port to listen on (defaults to config or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// List the selectable components
    List,

    /// Render every template in the templates directory
    Build {
        /// Output directory (defaults to config or "Test")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a selection of components and write it to the export folder
    Export {
        /// Component identifiers, in document order
        components: Vec<String>,

        /// Output file name
        #[arg(short, long)]
        filename: Option<String>,
    },

    /// Lint built documents
    Check {
        /// Only check this file
        file: Option<String>,

        /// Directory to check (defaults to config or "Test")
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let load_config = || Config::load(&cli.config);

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Serve { port, no_open } => {
            commands::serve::run(&load_config()?, port, !no_open).await?;
        }
        Commands::List => {
            commands::list::run(&load_config()?)?;
        }
        Commands::Build { output } => {
            commands::build::run(&load_config()?, output)?;
        }
        Commands::Export {
            components,
            filename,
        } => {
            commands::export::run(&load_config()?, components, filename)?;
        }
        Commands::Check { file, dir } => {
            commands::check::run(&load_config()?, file, dir)?;
        }
    }

    Ok(())
}
