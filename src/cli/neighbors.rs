//! CLI entry-point for browsing candidates of a single phrase.

use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use super::SearchArgs;
use crate::{config::Settings, link::Linker};

/// Args for the `neighbors` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Tokens of the phrase to look up.
    #[arg(required = true, num_args = 1..)]
    pub phrase: Vec<String>,
    /// Emit the candidates as a JSON array instead of tab-separated lines.
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub search: SearchArgs,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let embeddings = args.search.load_embeddings(&settings)?;
    let linker = Linker::new(embeddings, args.search.options());
    let links = linker.link_phrase(&args.phrase)?;
    if links.concepts.is_empty() {
        bail!("no known concepts in phrase {:?}", args.phrase.join(" "));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer(&mut out, &links.candidates)?;
        writeln!(out)?;
    } else {
        for candidate in &links.candidates {
            writeln!(out, "{}\t{:.4}", candidate.uri, candidate.score)?;
        }
    }
    Ok(())
}
