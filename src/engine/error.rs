//! Error types for the analysis engine.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// What kind of input a registration expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Directory,
    File,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputKind::Directory => "directory",
            InputKind::File => "file",
        })
    }
}

/// Errors reported by [`Engine`](super::Engine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// A registered path does not exist or is of the wrong kind.
    #[error("Invalid {kind} '{}' added.", path.display())]
    InvalidInput { path: PathBuf, kind: InputKind },

    /// `analyze()` was called with nothing registered.
    #[error("No source directory and file set.")]
    NoInput,

    /// A query ran before a successful `analyze()`.
    #[error("{query}() doesn't work before the source was analyzed.")]
    PrematureQuery { query: &'static str },

    #[error("Unknown package \"{name}\".")]
    UnknownPackage { name: String },

    /// A source file failed to parse; the whole run is aborted.
    #[error("{}:{source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parser worker threads could not be started.
    #[error("cannot start parser threads: {source}")]
    WorkerPool {
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

impl EngineError {
    pub fn invalid_input(path: impl Into<PathBuf>, kind: InputKind) -> Self {
        Self::InvalidInput {
            path: path.into(),
            kind,
        }
    }

    /// The file the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::InvalidInput { path, .. }
            | Self::Parse { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::NoInput
            | Self::PrematureQuery { .. }
            | Self::UnknownPackage { .. }
            | Self::WorkerPool { .. } => None,
        }
    }
}
