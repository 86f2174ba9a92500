//! Show command: render one resource without starting the server

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use lexlink_core::Iri;
use lexlink_web::{respond, AppState, ContentType};

use super::{load_file, StoreArgs};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Resource as prefix:local or a full IRI
    pub resource: String,

    /// Representation: json, msgpack, table, html, jsonld, turtle
    #[arg(short, long, default_value = "table")]
    pub format: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// JSON-lines triple dump to load first (repeatable)
    #[arg(long)]
    pub load: Vec<PathBuf>,

    /// Preferred label languages (overrides config)
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Vec<String>,
}

/// `prefix:local` through the route resolver, anything with a scheme as-is
fn parse_resource(state: &AppState, resource: &str) -> anyhow::Result<Iri> {
    if resource.contains("://") {
        return Ok(Iri::new(resource));
    }
    match resource.split_once(':') {
        Some((prefix, local)) => Ok(state.routes.resolve(prefix, local)?),
        None => anyhow::bail!("Expected prefix:local or a full IRI, got '{}'", resource),
    }
}

pub fn run(args: &ShowArgs, config: &Config) -> anyhow::Result<()> {
    let content_type = ContentType::from_format(&args.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown format '{}'", args.format))?;

    let store = args.store.open(config)?;
    for file in &args.load {
        load_file(file, store.as_ref())?;
    }

    let languages = if args.languages.is_empty() {
        config.languages.clone()
    } else {
        args.languages.clone()
    };
    let state = AppState::new(store, config.registry()?, languages, config.settings());
    let subject = parse_resource(&state, &args.resource)?;

    let response = respond(&state, &subject, content_type)?;
    if !response.status.is_success() {
        anyhow::bail!("No facts about {}", subject);
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.body)?;
    if !response.body.ends_with(b"\n") && content_type != ContentType::MsgPack {
        writeln!(stdout)?;
    }
    Ok(())
}
