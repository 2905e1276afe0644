//! Link nodes of parsed commonsense graphs to ConceptNet concepts using
//! Numberbatch embeddings.

pub mod cli;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod extract;
pub mod graph;
pub mod index;
pub mod link;
pub mod logging;
pub mod text;

pub use error::{LinkError, Result};
