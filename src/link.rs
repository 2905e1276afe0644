//! Node-to-concept linking over a loaded embedding index.

use std::io::{BufRead, Write};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    embeddings::Embeddings,
    error::{LinkError, Result},
    extract::ExtractionStrategy,
    graph::{self, Candidate, Instance},
    index::{FlatIndex, Metric},
    text,
};

pub const DEFAULT_URI_PREFIX: &str = "/c/en/";

/// Tunables for a linking run.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    pub metric: Metric,
    pub strategy: ExtractionStrategy,
    pub ngram_length: usize,
    pub num_candidates: usize,
    pub uri_prefix: String,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            metric: Metric::Cosine,
            strategy: ExtractionStrategy::Exhaustive,
            ngram_length: 3,
            num_candidates: 5,
            uri_prefix: DEFAULT_URI_PREFIX.to_string(),
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub instances: usize,
    pub nodes: usize,
    pub unmatched_nodes: usize,
    pub skipped_candidates: usize,
}

impl LinkSummary {
    fn absorb(&mut self, other: LinkSummary) {
        self.instances += other.instances;
        self.nodes += other.nodes;
        self.unmatched_nodes += other.unmatched_nodes;
        self.skipped_candidates += other.skipped_candidates;
    }
}

/// Candidates for one mention plus the concepts they were derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLinks {
    pub concepts: Vec<String>,
    pub candidates: Vec<Candidate>,
    pub skipped: usize,
}

pub struct Linker {
    embeddings: Embeddings,
    index: FlatIndex,
    options: LinkOptions,
}

impl Linker {
    pub fn new(embeddings: Embeddings, options: LinkOptions) -> Self {
        let index = FlatIndex::build(options.metric, &embeddings.matrix);
        Self {
            embeddings,
            index,
            options,
        }
    }

    /// Link a tokenised mention to its nearest vocabulary concepts.
    pub fn link_phrase(&self, phrase: &[String]) -> Result<NodeLinks> {
        let tokens = text::english_filter(&text::lowercase(phrase));
        let concepts = self.options.strategy.extract(
            &tokens,
            &self.embeddings.vocab,
            self.options.ngram_length,
        );
        let ids: Vec<usize> = concepts
            .iter()
            .filter_map(|concept| self.embeddings.vocab.id(concept))
            .collect();
        let Some(query) = self.embeddings.mean(&ids) else {
            return Ok(NodeLinks {
                concepts,
                ..NodeLinks::default()
            });
        };

        let hits = self.index.search(query.view(), self.options.num_candidates)?;
        let mut links = NodeLinks {
            concepts,
            candidates: Vec::with_capacity(hits.len()),
            skipped: 0,
        };
        for hit in hits {
            let Some(word) = self.embeddings.vocab.word(hit.id) else {
                continue;
            };
            // Numberbatch folds multi-digit numbers to '#', such entries link poorly.
            if word.contains('#') {
                warn!(%word, "skipping candidate containing '#'");
                links.skipped += 1;
                continue;
            }
            links.candidates.push(Candidate {
                uri: format!("{}{}", self.options.uri_prefix, word),
                score: hit.score,
            });
        }
        Ok(links)
    }

    /// Attach `candidates` to every node of `instance`.
    pub fn link_instance(&self, instance: &mut Instance) -> Result<LinkSummary> {
        let mut summary = LinkSummary {
            instances: 1,
            ..LinkSummary::default()
        };
        for (uri, node) in instance.nodes.iter_mut() {
            let links = self.link_phrase(&node.phrase)?;
            debug!(
                node = %uri,
                mention = %node.phrase.join(" "),
                concepts = ?links.concepts,
                candidates = links.candidates.len(),
                "linked node"
            );
            summary.nodes += 1;
            if links.concepts.is_empty() {
                summary.unmatched_nodes += 1;
            }
            summary.skipped_candidates += links.skipped;
            node.candidates = Some(links.candidates);
        }
        Ok(summary)
    }

    /// Stream JSONL instances from `input` to `output`, linking in parallel batches.
    ///
    /// Output lines keep the order of the non-blank input lines.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        mut output: W,
        batch_size: usize,
    ) -> Result<LinkSummary> {
        let batch_size = batch_size.max(1);
        let mut summary = LinkSummary::default();
        let mut batch: Vec<(usize, String)> = Vec::with_capacity(batch_size);
        let mut lines = graph::numbered_lines(input);
        loop {
            batch.clear();
            for entry in lines.by_ref().take(batch_size) {
                batch.push(entry?);
            }
            if batch.is_empty() {
                break;
            }

            let linked: Vec<(String, LinkSummary)> = batch
                .par_iter()
                .map(|(line, text)| self.link_line(text, *line))
                .collect::<Result<_>>()?;

            for (json, stats) in linked {
                writeln!(output, "{json}").map_err(|e| LinkError::stream("writing output", e))?;
                summary.absorb(stats);
            }
            debug!(instances = summary.instances, "batch written");
        }
        output
            .flush()
            .map_err(|e| LinkError::stream("flushing output", e))?;
        info!(?summary, "linking finished");
        Ok(summary)
    }

    fn link_line(&self, text: &str, line: usize) -> Result<(String, LinkSummary)> {
        let mut instance = graph::parse_instance(text, line)?;
        let stats = self.link_instance(&mut instance)?;
        let json = serde_json::to_string(&instance)
            .map_err(|source| LinkError::Instance { line, source })?;
        Ok((json, stats))
    }
}
