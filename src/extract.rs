//! Concept extraction from tokenised mentions.

use clap::ValueEnum;

use crate::{embeddings::Vocab, text::replace_numbers};

/// How n-grams of a mention are matched against the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExtractionStrategy {
    /// Every n-gram up to the maximum length that appears in the vocabulary.
    #[default]
    Exhaustive,
    /// Left-to-right longest match, consuming matched tokens.
    Greedy,
}

impl ExtractionStrategy {
    /// Concepts found in `tokens`, considering n-grams of length
    /// `1..=ngram_length` (inclusive) for both strategies.
    pub fn extract(self, tokens: &[String], vocab: &Vocab, ngram_length: usize) -> Vec<String> {
        match self {
            Self::Exhaustive => exhaustive(tokens, vocab, ngram_length),
            Self::Greedy => greedy(tokens, vocab, ngram_length),
        }
    }
}

/// ConceptNet form of an n-gram: underscore-joined, digits folded.
pub fn concept_form(tokens: &[String]) -> String {
    replace_numbers(&tokens.join("_"))
}

/// All in-vocabulary n-grams, shortest first, each length scanned left to right.
pub fn exhaustive(tokens: &[String], vocab: &Vocab, ngram_length: usize) -> Vec<String> {
    let mut out = Vec::new();
    for n in 1..=ngram_length.min(tokens.len()) {
        for window in tokens.windows(n) {
            let concept = concept_form(window);
            if vocab.contains(&concept) {
                out.push(concept);
            }
        }
    }
    out
}

pub fn greedy(tokens: &[String], vocab: &Vocab, ngram_length: usize) -> Vec<String> {
    let mut out = Vec::new();
    if ngram_length == 0 {
        return out;
    }
    let mut rest = tokens;
    while !rest.is_empty() {
        let longest = ngram_length.min(rest.len());
        let matched = (1..=longest).rev().find_map(|n| {
            let concept = concept_form(&rest[..n]);
            vocab.contains(&concept).then_some((n, concept))
        });
        match matched {
            Some((n, concept)) => {
                out.push(concept);
                rest = &rest[n..];
            }
            None => rest = &rest[1..],
        }
    }
    out
}
