//! Memoized dataset loads.
//!
//! The cache is owned by the hosting process and keyed by the file path plus
//! the schema projection. Nothing is evicted automatically; callers drop
//! entries with [`DatasetCache::invalidate`] or [`DatasetCache::clear`].

use super::{load_records, Schema};
use crate::error::LoadError;
use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    projection: &'static [&'static str],
}

impl CacheKey {
    fn of<R: Schema>(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            projection: R::COLUMNS,
        }
    }
}

/// Loaded record sets keyed by `(path, projection)`.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<CacheKey, Arc<dyn Any + Send + Sync>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached record set, loading it on first use.
    ///
    /// Failed loads are not cached, so the next call retries the read.
    pub fn get_or_load<R: Schema>(&mut self, path: &Path) -> Result<Arc<Vec<R>>, LoadError> {
        let key = CacheKey::of::<R>(path);

        if let Some(entry) = self.entries.get(&key) {
            if let Ok(records) = Arc::clone(entry).downcast::<Vec<R>>() {
                debug!("Cache hit for {}", path.display());
                return Ok(records);
            }
        }

        debug!("Cache miss for {}", path.display());
        let records = Arc::new(load_records::<R>(path)?);
        self.entries.insert(key, records.clone());
        Ok(records)
    }

    /// Whether a record set of type `R` is cached for `path`.
    pub fn contains<R: Schema>(&self, path: &Path) -> bool {
        self.entries
            .get(&CacheKey::of::<R>(path))
            .is_some_and(|entry| entry.is::<Vec<R>>())
    }

    /// Drop every projection cached for `path`. Returns how many were removed.
    pub fn invalidate(&mut self, path: &Path) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.path != path);
        let removed = before - self.entries.len();
        debug!("Invalidated {} cached projections of {}", removed, path.display());
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
