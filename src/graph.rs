//! Serde model of the JSONL graph instances being linked.

use std::io::BufRead;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LinkError, Result};

/// One parsed graph; fields other than `nodes` pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub nodes: IndexMap<String, Node>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub phrase: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A knowledge-base concept proposed for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub uri: String,
    pub score: f32,
}

/// Parse one JSONL record; `line` is used for error reporting.
pub fn parse_instance(text: &str, line: usize) -> Result<Instance> {
    serde_json::from_str(text).map_err(|source| LinkError::Instance { line, source })
}

/// Iterate `(line_number, raw_line)` pairs, skipping blank lines.
pub fn numbered_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(Ok((idx + 1, text))),
            Err(e) => Some(Err(LinkError::stream("reading input line", e))),
        })
}

/// Parse every instance from a JSONL reader.
pub fn read_instances<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Instance>> {
    numbered_lines(reader).map(|entry| entry.and_then(|(line, text)| parse_instance(&text, line)))
}
