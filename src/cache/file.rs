//! On-disk cache: one JSON document per source file and annotation mode.

use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use super::{CacheKey, MemoryCache, ParseCache};
use crate::registry::FileFragment;

/// Bumped whenever the stored fragment layout changes.
const FORMAT_VERSION: u32 = 1;

/// Persistent cache under a directory, fronted by a [`MemoryCache`].
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
    memory: MemoryCache,
}

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    version: u32,
    path: PathBuf,
    fingerprint: u64,
    fragment: FileFragment,
}

impl FileCache {
    /// The directory is created on first store.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            memory: MemoryCache::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let mut hasher = FxHasher::default();
        key.path.hash(&mut hasher);
        key.ignore_annotations.hash(&mut hasher);
        self.dir.join(format!("{:016x}.json", hasher.finish()))
    }

    fn read_entry(&self, key: &CacheKey) -> Option<FileFragment> {
        let path = self.entry_path(key);
        let content = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(entry = %path.display(), error = %e, "discarding unreadable cache entry");
                return None;
            }
        };
        (entry.version == FORMAT_VERSION && entry.fingerprint == key.fingerprint && entry.path == key.path)
            .then_some(entry.fragment)
    }

    fn write_entry(&self, key: &CacheKey, fragment: &FileFragment) -> Result<(), String> {
        fs::create_dir_all(&self.dir).map_err(|e| e.to_string())?;
        let entry = CacheEntry {
            version: FORMAT_VERSION,
            path: key.path.clone(),
            fingerprint: key.fingerprint,
            fragment: fragment.clone(),
        };
        let content = serde_json::to_string(&entry).map_err(|e| e.to_string())?;
        fs::write(self.entry_path(key), content).map_err(|e| e.to_string())
    }
}

impl ParseCache for FileCache {
    fn lookup(&self, key: &CacheKey) -> Option<FileFragment> {
        if let Some(fragment) = self.memory.lookup(key) {
            return Some(fragment);
        }
        let fragment = self.read_entry(key)?;
        self.memory.store(key.clone(), fragment.clone());
        Some(fragment)
    }

    fn store(&self, key: CacheKey, fragment: FileFragment) {
        if let Err(error) = self.write_entry(&key, &fragment) {
            tracing::warn!(dir = %self.dir.display(), %error, "cannot write cache entry");
        }
        self.memory.store(key, fragment);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::parser::parse;
    use crate::registry::Builder;
    use tempfile::TempDir;

    fn fragment(source: &str) -> FileFragment {
        Builder::new(false).build(parse(source).unwrap().source_file())
    }

    #[test]
    fn test_entries_survive_a_new_instance() {
        let dir = TempDir::new().unwrap();
        let source = "<?php namespace a; /** @throws E */ function f() {}";
        let key = CacheKey::new(Path::new("/src/f.php"), source, false);

        FileCache::new(dir.path()).store(key.clone(), fragment(source));

        let reopened = FileCache::new(dir.path());
        assert_eq!(reopened.lookup(&key), Some(fragment(source)));
    }

    #[test]
    fn test_changed_content_misses() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        cache.store(
            CacheKey::new(Path::new("/src/f.php"), "<?php class A {}", false),
            fragment("<?php class A {}"),
        );

        let reopened = FileCache::new(dir.path());
        let changed = CacheKey::new(Path::new("/src/f.php"), "<?php class B {}", false);
        assert!(reopened.lookup(&changed).is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let key = CacheKey::new(Path::new("/src/f.php"), "<?php", false);
        fs::write(cache.entry_path(&key), "{ not json").unwrap();
        assert!(cache.lookup(&key).is_none());
    }

    #[test]
    fn test_unwritable_dir_degrades_to_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let cache = FileCache::new(&blocker.join("cache"));
        let key = CacheKey::new(Path::new("/src/f.php"), "<?php class A {}", false);
        cache.store(key.clone(), fragment("<?php class A {}"));
        assert!(cache.lookup(&key).is_some());
    }
}
