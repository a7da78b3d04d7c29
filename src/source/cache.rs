//! File-per-build response cache. Keys are a short SHA-256 of position/height/wingspan/weight.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::attributes::AttributeCaps;
use crate::source::BuildQuery;

pub const DEFAULT_CACHE_DIR: &str = "data/cache";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt cache entry: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    enabled: bool,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            enabled: true,
        }
    }

    /// A cache that never hits and never writes.
    pub fn disabled() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CACHE_DIR),
            enabled: false,
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key(query: &BuildQuery) -> String {
        let raw = format!(
            "{}_{}_{}_{}",
            query.position, query.height, query.wingspan, query.weight
        );
        let digest = Sha256::digest(raw.as_bytes());
        format!("{}.json", hex::encode(&digest[..8]))
    }

    fn entry_path(&self, query: &BuildQuery) -> PathBuf {
        self.dir.join(Self::key(query))
    }

    /// `Ok(None)` on a miss or when disabled.
    pub fn get(&self, query: &BuildQuery) -> Result<Option<AttributeCaps>, CacheError> {
        if !self.enabled {
            return Ok(None);
        }
        let path = self.entry_path(query);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(%query, "cache miss");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        debug!(%query, path = %path.display(), "cache hit");
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn set(&self, caps: &AttributeCaps) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        let query = BuildQuery::new(caps.position.clone(), caps.height, caps.wingspan, caps.weight);
        fs::write(self.entry_path(&query), serde_json::to_string_pretty(caps)?)?;
        Ok(())
    }

    pub fn has(&self, query: &BuildQuery) -> bool {
        self.enabled && self.entry_path(query).is_file()
    }

    /// Remove the whole cache directory.
    pub fn clear(&self) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Number of cached entries.
    pub fn size(&self) -> Result<usize, CacheError> {
        if !self.enabled {
            return Ok(0);
        }
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };
        let mut count = 0;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }
}
