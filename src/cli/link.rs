//! CLI entry-point for linking a JSONL graph file.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use super::SearchArgs;
use crate::{config::Settings, link::Linker};

/// Args for the `link` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// JSONL file of parsed graphs, one instance per line.
    #[arg(long)]
    pub input: PathBuf,
    /// JSONL file receiving the linked instances.
    #[arg(long)]
    pub output: PathBuf,
    #[command(flatten)]
    pub search: SearchArgs,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let input = File::open(&args.input)
        .with_context(|| format!("opening input {}", args.input.display()))?;
    let embeddings = args.search.load_embeddings(&settings)?;
    let linker = Linker::new(embeddings, args.search.options());

    let output = File::create(&args.output)
        .with_context(|| format!("creating output {}", args.output.display()))?;
    let summary = linker
        .run(
            BufReader::new(input),
            BufWriter::new(output),
            settings.batch_size,
        )
        .with_context(|| format!("linking {}", args.input.display()))?;

    info!(
        output = %args.output.display(),
        instances = summary.instances,
        nodes = summary.nodes,
        unmatched = summary.unmatched_nodes,
        "wrote link candidates"
    );
    Ok(())
}
