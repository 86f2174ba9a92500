//! Import command

use std::path::PathBuf;

use clap::Args;
use lexlink_storage::BackendKind;

use super::{load_file, StoreArgs};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON-lines triple dump, one triple per line (`-` for stdin)
    pub file: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn run(args: &ImportArgs, config: &Config) -> anyhow::Result<()> {
    let (kind, _) = args.store.target(config)?;
    if kind == BackendKind::Memory {
        anyhow::bail!("Importing into the memory backend would discard the data; use --load with serve instead");
    }

    let store = args.store.open(config)?;
    let count = load_file(&args.file, store.as_ref())?;
    let total = store.triple_count()?;
    println!(
        "Imported {} new triples into {} store ({} total)",
        count,
        store.name(),
        total
    );
    Ok(())
}
