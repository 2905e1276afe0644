//! Command-line interface wiring for graphify.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;

use crate::{
    config::Settings,
    embeddings::{self, EmbeddingCache, Embeddings},
    extract::ExtractionStrategy,
    index::Metric,
    link::{LinkOptions, DEFAULT_URI_PREFIX},
};

pub mod link;
pub mod neighbors;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Link graph nodes to ConceptNet concepts", long_about = None)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Link(args) => link::run(args, settings),
            Commands::Neighbors(args) => neighbors::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Attach top-k ConceptNet candidates to every node of a JSONL graph file.
    Link(link::Args),
    /// Print the top-k ConceptNet candidates for an ad-hoc phrase.
    Neighbors(neighbors::Args),
}

/// Options shared by every command that searches the embeddings.
#[derive(Debug, Clone, ClapArgs)]
pub struct SearchArgs {
    /// Numberbatch embeddings in word2vec text format.
    #[arg(long, alias = "embedding-file", value_name = "PATH")]
    pub embeddings: PathBuf,
    /// Similarity metric.
    #[arg(long, value_enum, default_value_t = Metric::Cosine)]
    pub metric: Metric,
    /// Approach for extracting concepts from mentions.
    #[arg(long, value_enum, default_value_t = ExtractionStrategy::Exhaustive)]
    pub extraction_strategy: ExtractionStrategy,
    /// Max length of n-grams considered during concept extraction.
    #[arg(long, default_value_t = 3)]
    pub ngram_length: usize,
    /// Number of candidates per node.
    #[arg(long, default_value_t = 5)]
    pub num_candidates: usize,
    /// Prefix prepended to candidate words to form URIs.
    #[arg(long, default_value = DEFAULT_URI_PREFIX)]
    pub uri_prefix: String,
    /// Parse the embedding file without reading or writing the cache.
    #[arg(long)]
    pub no_cache: bool,
}

impl SearchArgs {
    pub fn options(&self) -> LinkOptions {
        LinkOptions {
            metric: self.metric,
            strategy: self.extraction_strategy,
            ngram_length: self.ngram_length,
            num_candidates: self.num_candidates,
            uri_prefix: self.uri_prefix.clone(),
        }
    }

    /// Load the embeddings named on the command line.
    pub fn load_embeddings(&self, settings: &Settings) -> Result<Embeddings> {
        let cache = if self.no_cache {
            None
        } else {
            Some(EmbeddingCache::open(&settings.cache_dir).context("opening embedding cache")?)
        };
        info!(path = %self.embeddings.display(), cached = cache.is_some(), "loading embeddings");
        embeddings::load(&self.embeddings, cache.as_ref())
            .with_context(|| format!("loading embeddings from {}", self.embeddings.display()))
    }
}
