//! Serve command

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use lexlink_web::{run_server, AppState};

use super::{load_file, StoreArgs};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides config)
    #[arg(long)]
    pub bind: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,

    /// JSON-lines triple dump to load before serving (repeatable)
    #[arg(long)]
    pub load: Vec<PathBuf>,

    /// Preferred label languages, most preferred first (overrides config)
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Vec<String>,
}

pub async fn run(args: &ServeArgs, config: &Config) -> anyhow::Result<()> {
    let store = args.store.open(config)?;
    for file in &args.load {
        let count = load_file(file, store.as_ref())?;
        tracing::info!("Loaded {} triples from {}", count, file.display());
    }

    let languages = if args.languages.is_empty() {
        config.languages.clone()
    } else {
        args.languages.clone()
    };
    let state = AppState::new(store, config.registry()?, languages, config.settings());
    let bind = args.bind.as_deref().unwrap_or(&config.bind);

    run_server(Arc::new(state), bind).await
}
