//! Lexlink CLI - serve and manage a linked-data resource store

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;

use commands::{completions, config as config_cmd, import, serve, show};
use config::{config_file_path, Config};

#[derive(Parser)]
#[command(name = "lexlink")]
#[command(author, version, about = "Linked-data resource server for lexical datasets")]
pub struct Cli {
    /// Config file
    #[arg(short, long, env = "LEXLINK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Bulk-load a JSON-lines triple dump into an on-disk store
    Import(import::ImportArgs),
    /// Render one resource to stdout
    Show(show::ShowArgs),
    /// Manage the config file
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting lexlink CLI");

    let config_path = cli.config_path();
    match &cli.command {
        Commands::Serve(args) => serve::run(args, &Config::load(&config_path)?).await?,
        Commands::Import(args) => import::run(args, &Config::load(&config_path)?)?,
        Commands::Show(args) => show::run(args, &Config::load(&config_path)?)?,
        Commands::Config(args) => config_cmd::run(args, &config_path)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
