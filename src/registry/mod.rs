//! Namespace registry
//!
//! A [`Builder`] turns one parsed file into a [`FileFragment`]; the engine
//! merges fragments into a [`Registry`] in discovery order, so namespace
//! iteration follows first insertion.

mod builder;
mod namespace;

pub use builder::{Builder, package_annotation, throws_annotations};
pub use namespace::{DeclarationKind, DeclarationRecord, FileFragment, NamespaceEntry, Registry};
