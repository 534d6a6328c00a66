//! # depend-base
//!
//! Core library for source analysis of PHP-like code: tokenizing, parsing
//! into a position-tracked AST, and building a namespace registry of
//! classes, interfaces and functions.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! engine    → Analysis facade: inputs, lifecycle, memoized registry
//!   ↓
//! cache     → Per-file fragment cache (memory, JSON files)
//!   ↓
//! config    → Settings, XML overrides, capability probe
//!   ↓
//! project   → File discovery and filters
//!   ↓
//! registry  → Namespace registry and the declaration builder
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, AST
//!   ↓
//! base      → Primitives (Position, Span, constants)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → registry → project → config → cache → engine)
// ============================================================================

/// Foundation types: Position, Span, constants
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, AST
pub mod parser;

/// Registry: namespace entries and declaration extraction
pub mod registry;

/// Project management: file discovery and filters
pub mod project;

/// Settings and configuration overrides
pub mod config;

/// Parse cache drivers
pub mod cache;

/// Analysis engine facade
pub mod engine;

// Re-export foundation types
pub use base::{Position, Span};

// Re-export the facade
pub use engine::{Engine, EngineError, EngineState, InputKind};
pub use registry::{DeclarationKind, DeclarationRecord, NamespaceEntry, Registry};
