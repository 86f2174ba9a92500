//! CLI command implementations

pub mod completions;
pub mod config;
pub mod import;
pub mod serve;
pub mod show;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use lexlink_storage::{load_jsonl, open_store, BackendKind, TripleStore};

use crate::config::Config;

/// Store selection shared by every command that opens a store
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Store backend: memory, redb, sqlite (overrides config)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Store file (overrides config)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

impl StoreArgs {
    /// Backend and path after applying flags over the config file
    pub fn target(&self, config: &Config) -> anyhow::Result<(BackendKind, Option<PathBuf>)> {
        let mut store = config.store.clone();
        if let Some(backend) = &self.backend {
            store.backend = backend.parse()?;
            if self.path.is_none() && store.backend != config.store.backend {
                store.path = None;
            }
        }
        if let Some(path) = &self.path {
            store.path = Some(path.clone());
        }
        Ok((store.backend, store.resolved_path()))
    }

    pub fn open(&self, config: &Config) -> anyhow::Result<Arc<dyn TripleStore>> {
        let (kind, path) = self.target(config)?;
        if let Some(parent) = path.as_deref().and_then(Path::parent) {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!("Using {} store at {:?}", kind, path);
        Ok(open_store(kind, path.as_deref())?)
    }
}

/// Load a JSON-lines dump; `-` reads standard input
pub fn load_file(file: &Path, store: &dyn TripleStore) -> anyhow::Result<usize> {
    let count = if file == Path::new("-") {
        load_jsonl(io::stdin().lock(), store)?
    } else {
        let reader = BufReader::new(
            File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
        );
        load_jsonl(reader, store)?
    };
    Ok(count)
}
