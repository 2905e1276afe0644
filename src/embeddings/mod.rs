//! Numberbatch embedding loading and vocabulary lookup.

pub mod cache;

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{LinkError, Result};

pub use cache::EmbeddingCache;

const PROGRESS_EVERY: usize = 100_000;

/// Ordered word list with a reverse lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocab {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocab {
    pub fn new(words: Vec<String>) -> Self {
        let index = words
            .iter()
            .enumerate()
            .map(|(idx, word)| (word.clone(), idx))
            .collect();
        Self { words, index }
    }

    pub fn id(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn word(&self, id: usize) -> Option<&str> {
        self.words.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<String>> for Vocab {
    fn from(words: Vec<String>) -> Self {
        Self::new(words)
    }
}

impl From<Vocab> for Vec<String> {
    fn from(vocab: Vocab) -> Self {
        vocab.words
    }
}

/// A vocabulary paired with its `rows x dims` vector matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embeddings {
    pub vocab: Vocab,
    pub matrix: Array2<f32>,
}

impl Embeddings {
    pub fn dims(&self) -> usize {
        self.matrix.ncols()
    }

    /// Every vocabulary word has exactly one matrix row.
    pub fn is_consistent(&self) -> bool {
        self.vocab.len() == self.matrix.nrows()
    }

    /// Average the rows named by `ids`, or `None` when `ids` is empty.
    pub fn mean(&self, ids: &[usize]) -> Option<Array1<f32>> {
        if ids.is_empty() {
            return None;
        }
        self.matrix.select(Axis(0), ids).mean_axis(Axis(0))
    }
}

/// Load embeddings, going through `cache` when one is supplied.
///
/// Cache failures are logged and never fail a load that parsed the text file.
#[instrument(skip(cache))]
pub fn load(path: &Path, cache: Option<&EmbeddingCache>) -> Result<Embeddings> {
    let Some(cache) = cache else {
        return read_text(path);
    };
    if let Some(embeddings) = cache.get(path)? {
        return Ok(embeddings);
    }
    let embeddings = read_text(path)?;
    if let Err(err) = cache.put(path, &embeddings) {
        warn!(path = %path.display(), error = %err, "could not write embedding cache entry");
    }
    Ok(embeddings)
}

/// Parse the word2vec-style text format used by Numberbatch releases.
pub fn read_text(path: &Path) -> Result<Embeddings> {
    debug!(path = %path.display(), "reading embeddings");
    let file = File::open(path).map_err(|e| LinkError::io("opening embedding file", path, e))?;
    let embeddings = parse(BufReader::new(file)).map_err(|err| match err {
        LinkError::Stream { context, source } => LinkError::io(context, path, source),
        other => other,
    })?;
    info!(
        path = %path.display(),
        words = embeddings.vocab.len(),
        dims = embeddings.dims(),
        "loaded embeddings"
    );
    Ok(embeddings)
}

/// Parse embeddings from any buffered reader.
///
/// Storage grows with the rows actually read, so a header is never trusted
/// for allocation.
pub fn parse<R: BufRead>(reader: R) -> Result<Embeddings> {
    let mut lines = reader.lines().enumerate();
    let header = match lines.next() {
        Some((_, line)) => line.map_err(|e| LinkError::stream("reading embedding header", e))?,
        None => return Err(LinkError::format(1, "empty file")),
    };
    let (rows, dims) = parse_header(&header)?;

    let mut values: Vec<f32> = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut last_line = 1usize;
    for (idx, line) in lines {
        let line_no = idx + 1;
        last_line = line_no;
        let line = line.map_err(|e| LinkError::stream("reading embedding row", e))?;
        if line.trim().is_empty() {
            continue;
        }
        if words.len() == rows {
            return Err(LinkError::format(
                line_no,
                format!("more rows than the {rows} declared in the header"),
            ));
        }
        let mut parts = line.split_whitespace();
        let word = parts
            .next()
            .ok_or_else(|| LinkError::format(line_no, "missing word"))?;
        let mut seen = 0usize;
        for part in parts {
            if seen == dims {
                return Err(LinkError::format(
                    line_no,
                    format!("expected {dims} components, found more"),
                ));
            }
            values.push(
                part.parse::<f32>()
                    .map_err(|e| LinkError::format(line_no, format!("bad component {part:?}: {e}")))?,
            );
            seen += 1;
        }
        if seen != dims {
            return Err(LinkError::format(
                line_no,
                format!("expected {dims} components, found {seen}"),
            ));
        }
        words.push(word.to_string());
        if words.len() % PROGRESS_EVERY == 0 {
            debug!(rows = words.len(), total = rows, "embedding rows read");
        }
    }
    if words.len() != rows {
        return Err(LinkError::format(
            last_line + 1,
            format!("header declares {rows} rows, file has {}", words.len()),
        ));
    }

    let matrix = Array2::from_shape_vec((rows, dims), values)
        .map_err(|e| LinkError::format(1, format!("header shape {rows}x{dims}: {e}")))?;
    Ok(Embeddings {
        vocab: Vocab::new(words),
        matrix,
    })
}

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    let [rows, dims] = fields.as_slice() else {
        return Err(LinkError::format(
            1,
            format!("expected `<rows> <dims>` header, found {header:?}"),
        ));
    };
    let parse = |field: &str| {
        field
            .parse::<usize>()
            .map_err(|e| LinkError::format(1, format!("bad header value {field:?}: {e}")))
    };
    let (rows, dims) = (parse(rows)?, parse(dims)?);
    match rows.checked_mul(dims) {
        Some(cells) if cells <= isize::MAX as usize => Ok((rows, dims)),
        _ => Err(LinkError::format(
            1,
            format!("header shape {rows}x{dims} is too large"),
        )),
    }
}
