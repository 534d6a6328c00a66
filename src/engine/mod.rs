//! Engine: the analysis facade.
//!
//! The `Engine` owns registered inputs, filters and settings, runs the
//! discovery → parse → build → merge pipeline, and memoizes the resulting
//! [`Registry`]. Queries are answered from the memoized registry only.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = Engine::new();
//! engine.add_directory("src")?;
//! engine.add_file_filter(ExtensionFilter::new(["php"]));
//!
//! let registry = engine.analyze()?;
//! let classes = engine.count_classes()?;
//! ```

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::base::constants::{MIN_PARSER_STACK_SIZE, STACK_BYTES_PER_NESTING_LEVEL};
use crate::cache::{self, CacheKey, ParseCache};
use crate::config::Settings;
use crate::parser::parse_with_nesting_limit;
use crate::project::{CompositeFilter, FileFilter, collect_file_paths, load_file};
use crate::registry::{Builder, FileFragment, NamespaceEntry, Registry};

pub use error::{EngineError, InputKind};

/// Lifecycle of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing registered yet.
    Unconfigured,
    /// Inputs registered, no memoized registry.
    Configured,
    /// A registry is memoized and queries are answered from it.
    Analyzed,
}

/// Analysis facade over a set of source directories and files.
pub struct Engine {
    directories: Vec<PathBuf>,
    files: Vec<PathBuf>,
    filter: CompositeFilter,
    ignore_annotations: bool,
    settings: Settings,
    /// Cache set by the caller, kept across settings changes.
    explicit_cache: bool,
    cache: Option<Arc<dyn ParseCache>>,
    registry: Option<Arc<Registry>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            directories: Vec::new(),
            files: Vec::new(),
            filter: CompositeFilter::new(),
            ignore_annotations: false,
            settings,
            explicit_cache: false,
            cache: None,
            registry: None,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Register a directory to be searched recursively.
    pub fn add_directory(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = canonical(path.as_ref(), InputKind::Directory)?;
        if !path.is_dir() {
            return Err(EngineError::invalid_input(path, InputKind::Directory));
        }
        tracing::debug!(dir = %path.display(), "registered source directory");
        self.directories.push(path);
        Ok(())
    }

    /// Register a single source file.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = canonical(path.as_ref(), InputKind::File)?;
        if !path.is_file() {
            return Err(EngineError::invalid_input(path, InputKind::File));
        }
        tracing::debug!(file = %path.display(), "registered source file");
        self.files.push(path);
        Ok(())
    }

    /// Add a filter; a file is analyzed only if every filter accepts it.
    pub fn add_file_filter(&mut self, filter: impl FileFilter + 'static) {
        self.filter.push(Box::new(filter));
    }

    /// Ignore `@throws` annotations; `throw new` statements still count.
    pub fn set_without_annotations(&mut self) {
        self.ignore_annotations = true;
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if !self.explicit_cache {
            self.cache = None;
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Use `cache` instead of the one selected by the settings.
    pub fn set_cache(&mut self, cache: Arc<dyn ParseCache>) {
        self.cache = Some(cache);
        self.explicit_cache = true;
    }

    pub fn state(&self) -> EngineState {
        if self.registry.is_some() {
            EngineState::Analyzed
        } else if self.directories.is_empty() && self.files.is_empty() {
            EngineState::Unconfigured
        } else {
            EngineState::Configured
        }
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Analyze all registered inputs, or return the memoized registry.
    ///
    /// Inputs and filters registered after a successful run take effect
    /// only after [`invalidate`](Self::invalidate).
    pub fn analyze(&mut self) -> Result<Arc<Registry>, EngineError> {
        if let Some(registry) = &self.registry {
            tracing::trace!("returning memoized registry");
            return Ok(Arc::clone(registry));
        }
        if self.directories.is_empty() && self.files.is_empty() {
            return Err(EngineError::NoInput);
        }

        let paths = self.discover()?;
        tracing::info!(files = paths.len(), "analyzing sources");

        let cache = Arc::clone(
            self.cache
                .get_or_insert_with(|| cache::from_settings(&self.settings)),
        );
        let builder = Builder::new(self.ignore_annotations);
        let nesting = self.settings.parser.nesting;

        // Recursion depth is bounded by the nesting limit, the stack must hold it
        let pool = rayon::ThreadPoolBuilder::new()
            .stack_size(parser_stack_size(nesting))
            .thread_name(|index| format!("depend-parser-{index}"))
            .build()
            .map_err(|source| EngineError::WorkerPool { source })?;

        // Parse in parallel; collect() keeps discovery order
        let fragments: Vec<Result<FileFragment, EngineError>> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| analyze_file(path, builder, nesting, cache.as_ref()))
                .collect()
        });

        let mut registry = Registry::new();
        for fragment in fragments {
            registry.merge(fragment?);
        }

        tracing::info!(
            namespaces = registry.len(),
            classes = registry.class_count(),
            interfaces = registry.interface_count(),
            functions = registry.function_count(),
            "analysis finished"
        );
        let registry = Arc::new(registry);
        self.registry = Some(Arc::clone(&registry));
        Ok(registry)
    }

    /// Drop the memoized registry so the next `analyze()` runs again.
    /// Unchanged files are then served from the parse cache.
    pub fn invalidate(&mut self) {
        self.registry = None;
    }

    /// Candidate files in discovery order: directories first, in
    /// registration order, then single files. Duplicates are dropped.
    fn discover(&self) -> Result<Vec<PathBuf>, EngineError> {
        let mut seen = FxHashSet::default();
        let mut accepted = Vec::new();

        let walked = self
            .directories
            .iter()
            .map(|dir| {
                collect_file_paths(dir).map_err(|source| EngineError::Io {
                    path: dir.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for path in walked.into_iter().flatten().chain(self.files.iter().cloned()) {
            if !seen.insert(path.clone()) {
                continue;
            }
            if self.filter.accept(&path) {
                tracing::debug!(file = %path.display(), "accepted");
                accepted.push(path);
            } else {
                tracing::debug!(file = %path.display(), "rejected by filter");
            }
        }
        Ok(accepted)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn analyzed(&self, query: &'static str) -> Result<&Arc<Registry>, EngineError> {
        self.registry
            .as_ref()
            .ok_or(EngineError::PrematureQuery { query })
    }

    /// Number of classes; interfaces are counted separately.
    pub fn count_classes(&self) -> Result<usize, EngineError> {
        Ok(self.analyzed("count_classes")?.class_count())
    }

    pub fn count_interfaces(&self) -> Result<usize, EngineError> {
        Ok(self.analyzed("count_interfaces")?.interface_count())
    }

    pub fn count_functions(&self) -> Result<usize, EngineError> {
        Ok(self.analyzed("count_functions")?.function_count())
    }

    /// Number of namespaces (packages).
    pub fn count_packages(&self) -> Result<usize, EngineError> {
        Ok(self.analyzed("count_packages")?.len())
    }

    pub fn get_package(&self, name: &str) -> Result<&NamespaceEntry, EngineError> {
        self.analyzed("get_package")?
            .get(name)
            .ok_or_else(|| EngineError::UnknownPackage {
                name: name.to_string(),
            })
    }

    /// The memoized registry, the same instance `analyze()` returned.
    pub fn get_packages(&self) -> Result<Arc<Registry>, EngineError> {
        self.analyzed("get_packages").map(Arc::clone)
    }
}

/// Worker stack size that holds a parse at the deepest nesting `nesting` allows.
fn parser_stack_size(nesting: usize) -> usize {
    nesting
        .saturating_mul(STACK_BYTES_PER_NESTING_LEVEL)
        .max(MIN_PARSER_STACK_SIZE)
}

fn canonical(path: &Path, kind: InputKind) -> Result<PathBuf, EngineError> {
    fs::canonicalize(path).map_err(|_| EngineError::invalid_input(path, kind))
}

/// Load, parse and build one file, going through the cache.
fn analyze_file(
    path: &Path,
    builder: Builder,
    nesting: usize,
    cache: &dyn ParseCache,
) -> Result<FileFragment, EngineError> {
    let content = load_file(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let key = CacheKey::new(path, &content, builder.ignores_annotations());
    if let Some(fragment) = cache.lookup(&key) {
        tracing::debug!(file = %path.display(), "cache hit");
        return Ok(fragment);
    }
    tracing::debug!(file = %path.display(), "cache miss");

    let parsed = parse_with_nesting_limit(&content, nesting).map_err(|source| EngineError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let fragment = builder.build(parsed.source_file());
    cache.store(key, fragment.clone());
    Ok(fragment)
}
