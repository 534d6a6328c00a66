//! Predicates deciding which discovered files are analyzed.

use std::path::Path;

use super::file_loader::get_extension;
use crate::base::constants::SOURCE_EXTENSIONS;

/// Accepts or rejects a candidate file.
pub trait FileFilter: Send + Sync {
    fn accept(&self, path: &Path) -> bool;
}

impl<F> FileFilter for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn accept(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Accepts files whose extension is in the list (case-insensitive).
#[derive(Clone, Debug)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// The usual source file extensions.
    pub fn sources() -> Self {
        Self::new(SOURCE_EXTENSIONS)
    }
}

impl FileFilter for ExtensionFilter {
    fn accept(&self, path: &Path) -> bool {
        get_extension(path).is_some_and(|ext| self.extensions.contains(&ext))
    }
}

/// Rejects files whose path contains any of the fragments, e.g. `/vendor/`.
#[derive(Clone, Debug)]
pub struct ExcludePathFilter {
    fragments: Vec<String>,
}

impl ExcludePathFilter {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(|f| normalize(&f.into())).collect(),
        }
    }
}

impl FileFilter for ExcludePathFilter {
    fn accept(&self, path: &Path) -> bool {
        let path = normalize(&path.to_string_lossy());
        !self.fragments.iter().any(|fragment| path.contains(fragment.as_str()))
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Logical AND of every added filter; empty accepts everything.
#[derive(Default)]
pub struct CompositeFilter {
    filters: Vec<Box<dyn FileFilter>>,
}

impl CompositeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Box<dyn FileFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FileFilter for CompositeFilter {
    fn accept(&self, path: &Path) -> bool {
        self.filters.iter().all(|filter| filter.accept(path))
    }
}

impl std::fmt::Debug for CompositeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("filters", &self.filters.len())
            .finish()
    }
}
