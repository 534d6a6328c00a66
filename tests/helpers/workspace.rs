//! Temporary source trees for engine tests.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use depend::Engine;
use depend::cache::MemoryCache;
use tempfile::TempDir;

/// A temporary directory of source files.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// An engine that keeps its cache in memory.
pub fn engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_cache(Arc::new(MemoryCache::new()));
    engine
}
