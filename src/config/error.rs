//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a configuration override.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The override file could not be read.
    #[error("cannot read configuration '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The override is not well-formed XML.
    #[error("XML error in configuration: {0}")]
    Xml(String),

    /// An element holds a value of the wrong shape.
    #[error("invalid value '{value}' for <{element}>")]
    InvalidValue { element: String, value: String },
}

impl ConfigError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create an invalid value error.
    pub fn invalid_value(element: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            element: element.into(),
            value: value.into(),
        }
    }
}
