//! Runtime configuration utilities for graphify.

use std::{env, path::PathBuf};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding parsed embedding caches.
    pub cache_dir: PathBuf,
    /// Number of input lines linked per parallel batch.
    pub batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(".cache"),
            batch_size: 256,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let cache_dir = env::var("GRAPHIFY_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);
        let batch_size = env::var("GRAPHIFY_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.batch_size);

        Self {
            cache_dir,
            batch_size,
        }
    }
}
