//! Position-tracked abstract syntax tree.
//!
//! The tree is untyped at the storage level: every node is a [`Node`] with a
//! [`NodeKind`], a [`Span`], an image and the children it exclusively owns.
//! Typed views over it ([`ClassDecl`], [`Literal`], ...) are obtained with
//! [`AstNode::cast`]. There are no parent pointers; use [`ParentIndex`] when
//! an upward lookup is needed.

mod index;
mod nodes;

pub use index::ParentIndex;
pub use nodes::*;

use smol_str::SmolStr;

use crate::base::Span;

/// Pre-order index of a node within its file's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Literal categories, dispatched on the literal's token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Boolean,
    Integer,
    Float,
    String,
    Null,
}

/// All node kinds of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Declarations
    SourceFile,
    Namespace,
    UseDeclaration,
    Class,
    Interface,
    Trait,
    Function,
    Method,
    Property,
    Constant,
    Parameter,
    ParentClass,
    ImplementedInterface,
    TypeHint,

    // Statements
    Block,
    ExpressionStatement,
    Return,
    Throw,
    If,
    ElseIf,
    Else,
    While,
    For,
    Foreach,
    Try,
    Catch,
    Finally,
    Echo,
    Break,
    Continue,
    Switch,
    Case,
    DefaultCase,
    DoWhile,
    Global,
    StaticVariables,

    // Expressions
    Assignment,
    ConditionalExpression,
    BinaryExpression,
    UnaryExpression,
    PostfixExpression,
    CastExpression,
    InstanceOf,
    Allocation,
    Closure,
    Clone,
    Include,
    Print,
    Arguments,
    Call,
    MemberAccess,
    StaticAccess,
    Index,
    Array,
    ArrayElement,
    Variable,
    Identifier,
    Literal(LiteralKind),
}

impl NodeKind {
    /// Declarations that own a doc comment.
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Interface
                | Self::Trait
                | Self::Function
                | Self::Method
                | Self::Property
                | Self::Constant
        )
    }
}

/// Declaration modifiers packed into a small bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const PUBLIC: Modifiers = Modifiers(1);
    pub const PROTECTED: Modifiers = Modifiers(1 << 1);
    pub const PRIVATE: Modifiers = Modifiers(1 << 2);
    pub const STATIC: Modifiers = Modifiers(1 << 3);
    pub const ABSTRACT: Modifiers = Modifiers(1 << 4);
    pub const FINAL: Modifiers = Modifiers(1 << 5);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Modifiers) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// One node of the tree.
///
/// The image holds the verbatim source text for terminals (literals,
/// variables, identifiers), the declared name for declarations, and the
/// operator for operator expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    span: Span,
    image: SmolStr,
    modifiers: Modifiers,
    doc_comment: Option<SmolStr>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            id: NodeId::default(),
            kind,
            span,
            image: SmolStr::default(),
            modifiers: Modifiers::empty(),
            doc_comment: None,
            children: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<SmolStr>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_doc_comment(mut self, doc_comment: Option<SmolStr>) -> Self {
        self.doc_comment = doc_comment;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn first_child(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Pre-order traversal of this node and everything below it.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First node of `kind` in pre-order, excluding `self`.
    pub fn first_descendant(&self, kind: NodeKind) -> Option<&Node> {
        self.descendants().skip(1).find(|n| n.kind == kind)
    }

    /// Assigns pre-order ids to this subtree, starting at `next`.
    pub(crate) fn assign_ids(&mut self, next: &mut u32) {
        self.id = NodeId::new(*next);
        *next += 1;
        for child in &mut self.children {
            child.assign_ids(next);
        }
    }
}

/// Pre-order iterator returned by [`Node::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
