use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{CacheKey, ParseCache};
use crate::registry::FileFragment;

/// Process-local cache; entries live as long as the cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<FxHashMap<CacheKey, FileFragment>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl ParseCache for MemoryCache {
    fn lookup(&self, key: &CacheKey) -> Option<FileFragment> {
        self.entries.read().get(key).cloned()
    }

    fn store(&self, key: CacheKey, fragment: FileFragment) {
        self.entries.write().insert(key, fragment);
    }
}
