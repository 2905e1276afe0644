//! On-disk cache of parsed embedding files.
//!
//! Parsing a multi-gigabyte Numberbatch text file dominates start-up, so the
//! parsed vocabulary and matrix are stored as a `bincode` blob. Entries are
//! named `<source>-<version>.bin`: `source` hashes the canonical path and
//! `version` hashes its length and modification time. Writing a new version
//! removes the older versions of the same source.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::Embeddings;
use crate::error::{LinkError, Result};

const ENTRY_EXTENSION: &str = "bin";

/// Directory of cached embedding blobs.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    dir: PathBuf,
}

/// Identity of an embedding file within the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub source: String,
    pub version: String,
}

impl CacheKey {
    fn file_name(&self) -> String {
        format!("{}-{}.{ENTRY_EXTENSION}", self.source, self.version)
    }
}

impl EmbeddingCache {
    /// Open the cache rooted at `dir`, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!(path = %dir.display(), "creating cache dir");
            fs::create_dir_all(&dir).map_err(|e| LinkError::io("creating cache dir", &dir, e))?;
        }
        Ok(Self { dir })
    }

    /// Location of the entry for `source`.
    pub fn entry_path(&self, source: &Path) -> Result<PathBuf> {
        Ok(self.dir.join(cache_key(source)?.file_name()))
    }

    /// Return the cached embeddings for `source`, if a usable entry exists.
    ///
    /// Unreadable, corrupt or inconsistent entries count as misses.
    pub fn get(&self, source: &Path) -> Result<Option<Embeddings>> {
        let path = self.entry_path(source)?;
        if !path.exists() {
            return Ok(None);
        }
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot open cache entry");
                return Ok(None);
            }
        };
        let embeddings = match bincode::deserialize_from::<_, Embeddings>(BufReader::new(file)) {
            Ok(embeddings) => embeddings,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "discarding corrupt cache entry");
                return Ok(None);
            }
        };
        if !embeddings.is_consistent() {
            warn!(
                path = %path.display(),
                words = embeddings.vocab.len(),
                rows = embeddings.matrix.nrows(),
                "discarding cache entry with mismatched vocabulary and matrix"
            );
            return Ok(None);
        }
        info!(
            path = %path.display(),
            words = embeddings.vocab.len(),
            "loaded embeddings from cache"
        );
        Ok(Some(embeddings))
    }

    /// Store `embeddings` as the entry for `source`, evicting its older versions.
    pub fn put(&self, source: &Path, embeddings: &Embeddings) -> Result<PathBuf> {
        let key = cache_key(source)?;
        let path = self.dir.join(key.file_name());
        let tmp = path.with_extension("tmp");
        let written = write_entry(&tmp, embeddings)
            .and_then(|()| {
                fs::rename(&tmp, &path)
                    .map_err(|e| LinkError::io("publishing cache entry", &path, e))
            });
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        debug!(path = %path.display(), "wrote cache entry");
        self.evict_stale(&key);
        Ok(path)
    }

    fn evict_stale(&self, key: &CacheKey) {
        let current = key.file_name();
        let prefix = format!("{}-", key.source);
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.dir.display(), error = %err, "cannot list cache dir");
                return;
            }
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name == current || !name.starts_with(&prefix) {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => debug!(entry = %name, "removed stale cache entry"),
                Err(err) => warn!(entry = %name, error = %err, "cannot remove stale cache entry"),
            }
        }
    }
}

fn write_entry(tmp: &Path, embeddings: &Embeddings) -> Result<()> {
    let file = File::create(tmp).map_err(|e| LinkError::io("creating cache entry", tmp, e))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, embeddings).map_err(|source| LinkError::Cache {
        path: tmp.to_path_buf(),
        source,
    })?;
    writer
        .flush()
        .map_err(|e| LinkError::io("flushing cache entry", tmp, e))
}

/// Hash the identity of `source`: its canonical path, length and mtime.
pub fn cache_key(source: &Path) -> Result<CacheKey> {
    let canonical = source
        .canonicalize()
        .map_err(|e| LinkError::io("resolving embedding file", source, e))?;
    let meta = fs::metadata(&canonical)
        .map_err(|e| LinkError::io("reading embedding file metadata", &canonical, e))?;
    let modified = meta
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    let source = format!(
        "{:x}",
        Sha256::digest(canonical.to_string_lossy().as_bytes())
    );
    let mut hasher = Sha256::new();
    hasher.update(meta.len().to_le_bytes());
    hasher.update(modified.to_le_bytes());
    Ok(CacheKey {
        source,
        version: format!("{:x}", hasher.finalize()),
    })
}
