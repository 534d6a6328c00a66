//! Parse cache
//!
//! Stores each file's [`FileFragment`] keyed by path, content fingerprint
//! and annotation mode, so unchanged files are not parsed again. A cache
//! never changes analysis results; unreadable entries are treated as misses.

mod memory;
#[cfg(feature = "persistent-cache")]
mod file;

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHasher;

use crate::config::{CacheDriver, Settings};
use crate::registry::FileFragment;

#[cfg(feature = "persistent-cache")]
pub use file::FileCache;
pub use memory::MemoryCache;

/// Storage for per-file registry fragments.
pub trait ParseCache: Send + Sync {
    fn lookup(&self, key: &CacheKey) -> Option<FileFragment>;

    fn store(&self, key: CacheKey, fragment: FileFragment);
}

/// Identifies one analysis of one file's content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub fingerprint: u64,
    pub ignore_annotations: bool,
}

impl CacheKey {
    pub fn new(path: &Path, content: &str, ignore_annotations: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            fingerprint: fingerprint(content),
            ignore_annotations,
        }
    }
}

/// 64-bit content hash used to detect changed files.
pub fn fingerprint(content: &str) -> u64 {
    let mut hasher = FxHasher::default();
    content.hash(&mut hasher);
    hasher.finish()
}

/// The cache selected by `settings.cache`.
pub fn from_settings(settings: &Settings) -> Arc<dyn ParseCache> {
    match settings.cache.driver {
        CacheDriver::Memory => Arc::new(MemoryCache::new()),
        #[cfg(feature = "persistent-cache")]
        CacheDriver::File => Arc::new(FileCache::new(&settings.cache.location)),
        #[cfg(not(feature = "persistent-cache"))]
        CacheDriver::File => {
            tracing::warn!("file cache driver requires the `persistent-cache` feature, using memory");
            Arc::new(MemoryCache::new())
        }
    }
}
