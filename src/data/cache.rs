//! Default Dataset Cache
//! Memoizes the default file load, keyed by path and modification time,
//! with an explicit expiry.

use super::dataset::Dataset;
use super::loader::{DataLoader, LoadError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info};

/// One day, matching the refresh period of the default export.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CacheEntry {
    path: PathBuf,
    modified: Option<SystemTime>,
    loaded_at: Instant,
    dataset: Arc<Dataset>,
}

/// Single-slot cache for the default dataset.
pub struct DatasetCache {
    loader: DataLoader,
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl DatasetCache {
    pub fn new(loader: DataLoader, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            entry: None,
        }
    }

    /// Return the cached dataset for `path`, reloading when the path, the
    /// file's modification time or the expiry no longer match.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok();

        if let Some(entry) = &self.entry {
            let fresh = entry.path == path
                && entry.modified == modified
                && entry.loaded_at.elapsed() < self.ttl;
            if fresh {
                debug!(path = %path.display(), "Default dataset served from cache");
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        let dataset = Arc::new(self.loader.load_file(path)?);
        info!(path = %path.display(), records = dataset.len(), "Default dataset cached");
        self.entry = Some(CacheEntry {
            path: path.to_path_buf(),
            modified,
            loaded_at: Instant::now(),
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }
}
