//! Registry data: declaration records grouped into namespace entries.

use indexmap::{IndexMap, IndexSet};
#[cfg(feature = "persistent-cache")]
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::base::Span;

// ============================================================================
// DECLARATIONS
// ============================================================================

/// The kind of a registered declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "persistent-cache", derive(Serialize, Deserialize))]
pub enum DeclarationKind {
    Class,
    Interface,
    Function,
}

impl DeclarationKind {
    pub fn display(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Function => "function",
        }
    }
}

/// One class, interface or function as seen by the registry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "persistent-cache", derive(Serialize, Deserialize))]
pub struct DeclarationRecord {
    pub name: SmolStr,
    pub kind: DeclarationKind,
    /// The namespace the declaration was assigned to.
    pub namespace: SmolStr,
    /// Referenced exception classes, in first-seen order.
    pub exceptions: IndexSet<SmolStr>,
    pub span: Span,
}

impl DeclarationRecord {
    pub fn new(name: impl Into<SmolStr>, kind: DeclarationKind, namespace: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            namespace: namespace.into(),
            exceptions: IndexSet::new(),
            span,
        }
    }

    pub fn exceptions(&self) -> impl Iterator<Item = &str> {
        self.exceptions.iter().map(SmolStr::as_str)
    }
}

// ============================================================================
// NAMESPACE ENTRIES
// ============================================================================

/// Declarations of one namespace, each list in insertion order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "persistent-cache", derive(Serialize, Deserialize))]
pub struct NamespaceEntry {
    name: SmolStr,
    classes: Vec<DeclarationRecord>,
    interfaces: Vec<DeclarationRecord>,
    functions: Vec<DeclarationRecord>,
}

impl NamespaceEntry {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            classes: Vec::new(),
            interfaces: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &[DeclarationRecord] {
        &self.classes
    }

    pub fn interfaces(&self) -> &[DeclarationRecord] {
        &self.interfaces
    }

    pub fn functions(&self) -> &[DeclarationRecord] {
        &self.functions
    }

    /// First class with the given name.
    pub fn class(&self, name: &str) -> Option<&DeclarationRecord> {
        self.classes.iter().find(|r| r.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&DeclarationRecord> {
        self.interfaces.iter().find(|r| r.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&DeclarationRecord> {
        self.functions.iter().find(|r| r.name == name)
    }

    /// Add a record to the list for its kind. Duplicate names are kept.
    pub fn push(&mut self, record: DeclarationRecord) {
        match record.kind {
            DeclarationKind::Class => self.classes.push(record),
            DeclarationKind::Interface => self.interfaces.push(record),
            DeclarationKind::Function => self.functions.push(record),
        }
    }

    /// All records: classes, then interfaces, then functions.
    pub fn declarations(&self) -> impl Iterator<Item = &DeclarationRecord> {
        self.classes
            .iter()
            .chain(&self.interfaces)
            .chain(&self.functions)
    }

    pub fn len(&self) -> usize {
        self.classes.len() + self.interfaces.len() + self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn absorb(&mut self, other: NamespaceEntry) {
        self.classes.extend(other.classes);
        self.interfaces.extend(other.interfaces);
        self.functions.extend(other.functions);
    }
}

// ============================================================================
// FRAGMENTS AND THE REGISTRY
// ============================================================================

/// Everything one file contributes to the registry.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "persistent-cache", derive(Serialize, Deserialize))]
pub struct FileFragment {
    namespaces: IndexMap<SmolStr, NamespaceEntry>,
}

impl FileFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DeclarationRecord) {
        self.namespaces
            .entry(record.namespace.clone())
            .or_insert_with_key(|name| NamespaceEntry::new(name.clone()))
            .push(record);
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceEntry> {
        self.namespaces.values()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &DeclarationRecord> {
        self.namespaces.values().flat_map(NamespaceEntry::declarations)
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

/// All namespaces of an analysis run, keyed by name in first-insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registry {
    namespaces: IndexMap<SmolStr, NamespaceEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's contribution. Namespaces new to the registry are
    /// appended; existing ones keep their position and grow.
    pub fn merge(&mut self, fragment: FileFragment) {
        for (name, entry) in fragment.namespaces {
            match self.namespaces.get_mut(&name) {
                Some(existing) => existing.absorb(entry),
                None => {
                    self.namespaces.insert(name, entry);
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&NamespaceEntry> {
        self.namespaces.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    /// Namespaces in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NamespaceEntry> {
        self.namespaces.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(SmolStr::as_str)
    }

    pub fn first(&self) -> Option<&NamespaceEntry> {
        self.namespaces.first().map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn class_count(&self) -> usize {
        self.iter().map(|ns| ns.classes().len()).sum()
    }

    pub fn interface_count(&self) -> usize {
        self.iter().map(|ns| ns.interfaces().len()).sum()
    }

    pub fn function_count(&self) -> usize {
        self.iter().map(|ns| ns.functions().len()).sum()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a NamespaceEntry;
    type IntoIter = indexmap::map::Values<'a, SmolStr, NamespaceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.namespaces.values()
    }
}
