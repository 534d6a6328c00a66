//! Foundation types for the depend toolchain.
//!
//! This module provides fundamental types used throughout the pipeline:
//! - [`Position`], [`Span`] - 1-based line/column locations for tokens and nodes
//! - [`TextRange`], [`TextSize`] - Byte offsets into the source text
//! - Domain constants (default namespace, annotation tags, extensions)
//!
//! This module has NO dependencies on other depend modules.

pub mod constants;
mod position;

pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
