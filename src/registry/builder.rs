//! Declaration extraction from a parsed file, a pure function from tree to
//! [`FileFragment`].
//!
//! Namespace resolution per declaration:
//! 1. the enclosing `namespace` statement or block, when it has a name
//! 2. the `@package` annotation of the declaration's doc comment
//! 3. the default namespace
//!
//! Exception references come from `@throws` annotations (dropped when
//! annotations are ignored) and from `throw new Name(...)` statements in
//! bodies. A class or interface collects the union over its methods.

use indexmap::IndexSet;
use smol_str::SmolStr;

use super::namespace::{DeclarationKind, DeclarationRecord, FileFragment};
use crate::base::constants::{DEFAULT_NAMESPACE, NAMESPACE_SEPARATOR, PACKAGE_ANNOTATION, THROWS_ANNOTATION};
use crate::parser::{AstNode, ClassDecl, Declaration, FunctionDecl, InterfaceDecl, MethodDecl, Node, NodeKind, SourceFile, ThrowStatement};

/// Builds registry fragments from parsed files.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder {
    ignore_annotations: bool,
}

impl Builder {
    pub fn new(ignore_annotations: bool) -> Self {
        Self { ignore_annotations }
    }

    pub fn ignores_annotations(&self) -> bool {
        self.ignore_annotations
    }

    /// Collect every class, interface and function declared in `file`.
    pub fn build(&self, file: SourceFile<'_>) -> FileFragment {
        let mut fragment = FileFragment::new();
        for child in file.syntax().children() {
            if child.kind() == NodeKind::Namespace {
                let name = Some(child.image()).filter(|n| !n.is_empty());
                for member in child.children() {
                    self.collect(member, name, &mut fragment);
                }
            } else {
                self.collect(child, None, &mut fragment);
            }
        }
        fragment
    }

    /// Register declarations at or below `node`, without entering bodies.
    fn collect(&self, node: &Node, namespace: Option<&str>, fragment: &mut FileFragment) {
        let record = match node.kind() {
            NodeKind::Class => ClassDecl::cast(node).map(|class| {
                let methods: Vec<_> = class.methods().collect();
                self.record(class, DeclarationKind::Class, namespace, &methods)
            }),
            NodeKind::Interface => InterfaceDecl::cast(node).map(|interface| {
                let methods: Vec<_> = interface.methods().collect();
                self.record(interface, DeclarationKind::Interface, namespace, &methods)
            }),
            NodeKind::Function => FunctionDecl::cast(node).map(|function| {
                let mut record = self.record(function, DeclarationKind::Function, namespace, &[]);
                self.add_exceptions(function, function.body(), &mut record.exceptions);
                record
            }),
            NodeKind::Closure | NodeKind::Trait => return,
            _ => {
                // conditional declarations inside top-level control flow
                for child in node.children() {
                    self.collect(child, namespace, fragment);
                }
                return;
            }
        };

        if let Some(record) = record {
            tracing::trace!(
                name = %record.name,
                kind = record.kind.display(),
                namespace = %record.namespace,
                "registered declaration"
            );
            fragment.push(record);
        }
    }

    fn record<'a, D: Declaration<'a>>(
        &self,
        declaration: D,
        kind: DeclarationKind,
        namespace: Option<&str>,
        methods: &[MethodDecl<'a>],
    ) -> DeclarationRecord {
        let namespace = namespace
            .map(SmolStr::new)
            .or_else(|| declaration.doc_comment().and_then(package_annotation))
            .unwrap_or_else(|| SmolStr::new(DEFAULT_NAMESPACE));

        let mut record = DeclarationRecord::new(
            strip_leading_separator(declaration.name()),
            kind,
            namespace,
            declaration.span(),
        );
        for method in methods {
            self.add_exceptions(*method, method.body(), &mut record.exceptions);
        }
        record
    }

    /// Exceptions named by `declaration`'s `@throws` tags and thrown in `body`.
    fn add_exceptions<'a, D: Declaration<'a>>(
        &self,
        declaration: D,
        body: Option<&'a Node>,
        into: &mut IndexSet<SmolStr>,
    ) {
        if !self.ignore_annotations {
            if let Some(doc) = declaration.doc_comment() {
                into.extend(throws_annotations(doc));
            }
        }
        if let Some(body) = body {
            into.extend(
                body.descendants()
                    .filter_map(ThrowStatement::cast)
                    .filter_map(|throw| throw.thrown_class())
                    .map(strip_leading_separator),
            );
        }
    }
}

/// Names following `@throws` tags; `A|B` yields both.
pub fn throws_annotations(doc: &str) -> Vec<SmolStr> {
    annotation_values(doc, THROWS_ANNOTATION)
        .flat_map(|value| value.split('|'))
        .filter(|name| !name.is_empty())
        .map(strip_leading_separator)
        .collect()
}

/// The first `@package` value of a doc comment.
pub fn package_annotation(doc: &str) -> Option<SmolStr> {
    annotation_values(doc, PACKAGE_ANNOTATION)
        .next()
        .map(strip_leading_separator)
}

/// The first word after every occurrence of `tag` at the start of a doc line.
fn annotation_values<'d>(doc: &'d str, tag: &'static str) -> impl Iterator<Item = &'d str> {
    doc.lines().filter_map(move |line| {
        let line = line
            .trim_start()
            .trim_start_matches("/**")
            .trim_start_matches('*')
            .trim_start();
        let rest = line.strip_prefix(tag)?;
        // `@packageFoo` is a different tag
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        rest.split_whitespace()
            .next()
            .map(|value| value.trim_end_matches("*/"))
            .filter(|value| !value.is_empty())
    })
}

fn strip_leading_separator(name: &str) -> SmolStr {
    SmolStr::new(name.trim_start_matches(NAMESPACE_SEPARATOR))
}
