//! Error types shared by the linking pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while loading embeddings or linking graph instances.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("{context} ({path}): {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Stream {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed embedding file at line {line}: {message}")]
    EmbeddingFormat { line: usize, message: String },

    #[error("invalid instance at line {line}: {source}")]
    Instance {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("query has {actual} dimensions, index expects {expected}")]
    Dimension { expected: usize, actual: usize },

    #[error("embedding cache entry {path} is unusable: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}

impl LinkError {
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn stream(context: &'static str, source: std::io::Error) -> Self {
        Self::Stream { context, source }
    }

    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::EmbeddingFormat {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T, E = LinkError> = std::result::Result<T, E>;
