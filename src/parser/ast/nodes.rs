//! Typed AST wrappers over the untyped [`Node`] tree.
//!
//! Each struct wraps a `&Node` of a known kind and provides accessors for
//! its children.

use super::{LiteralKind, Modifiers, Node, NodeKind};
use crate::base::Span;

/// A typed view over a [`Node`].
pub trait AstNode<'a>: Sized + Copy {
    fn can_cast(kind: NodeKind) -> bool;

    fn cast(node: &'a Node) -> Option<Self>;

    fn syntax(&self) -> &'a Node;

    fn span(&self) -> Span {
        self.syntax().span()
    }
}

/// Declarations that carry a name and an optional doc comment.
pub trait Declaration<'a>: AstNode<'a> {
    fn name(&self) -> &'a str {
        self.syntax().image()
    }

    fn doc_comment(&self) -> Option<&'a str> {
        self.syntax().doc_comment()
    }
}

/// Declares a wrapper struct and its [`AstNode`] impl for the given kinds.
macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:pat) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name<'a>(pub(crate) &'a Node);

        impl<'a> AstNode<'a> for $name<'a> {
            fn can_cast(kind: NodeKind) -> bool {
                matches!(kind, $kind)
            }

            fn cast(node: &'a Node) -> Option<Self> {
                Self::can_cast(node.kind()).then_some(Self(node))
            }

            fn syntax(&self) -> &'a Node {
                self.0
            }
        }
    };
}

/// Generates a method returning an iterator over direct children of a type.
macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type<'a>> + 'a {
            self.0.children().iter().filter_map($type::cast)
        }
    };
}

/// Generates a method returning the image of every direct child of a kind.
macro_rules! child_images_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Get the images of all `", stringify!($kind), "` children.")]
        pub fn $name(&self) -> impl Iterator<Item = &'a str> + 'a {
            self.0
                .children()
                .iter()
                .filter(|c| c.kind() == NodeKind::$kind)
                .map(|c| c.image())
        }
    };
}

ast_node!(
    /// Root of one parsed file.
    SourceFile,
    NodeKind::SourceFile
);

impl<'a> SourceFile<'a> {
    children_method!(namespaces, NamespaceDecl);
    children_method!(uses, UseDeclaration);
    children_method!(classes, ClassDecl);
    children_method!(interfaces, InterfaceDecl);
    children_method!(functions, FunctionDecl);
}

ast_node!(
    /// `namespace a\b;` (owning every member up to the next namespace) or
    /// `namespace a\b { ... }`. The global braced form has an empty name.
    NamespaceDecl,
    NodeKind::Namespace
);

impl<'a> NamespaceDecl<'a> {
    pub fn name(&self) -> &'a str {
        self.0.image()
    }

    children_method!(uses, UseDeclaration);
    children_method!(classes, ClassDecl);
    children_method!(interfaces, InterfaceDecl);
    children_method!(functions, FunctionDecl);
}

ast_node!(
    /// `use a\b\C as D;`
    UseDeclaration,
    NodeKind::UseDeclaration
);

impl<'a> UseDeclaration<'a> {
    /// The imported qualified name.
    pub fn target(&self) -> &'a str {
        self.0.image()
    }

    pub fn alias(&self) -> Option<&'a str> {
        self.0.first_child(NodeKind::Identifier).map(|n| n.image())
    }
}

ast_node!(ClassDecl, NodeKind::Class);

impl<'a> Declaration<'a> for ClassDecl<'a> {}

impl<'a> ClassDecl<'a> {
    pub fn is_abstract(&self) -> bool {
        self.0.modifiers().contains(Modifiers::ABSTRACT)
    }

    pub fn is_final(&self) -> bool {
        self.0.modifiers().contains(Modifiers::FINAL)
    }

    pub fn parent_class(&self) -> Option<&'a str> {
        self.0.first_child(NodeKind::ParentClass).map(|n| n.image())
    }

    child_images_method!(implemented_interfaces, ImplementedInterface);
    children_method!(methods, MethodDecl);
    children_method!(properties, PropertyDecl);
    children_method!(constants, ConstantDecl);
}

ast_node!(InterfaceDecl, NodeKind::Interface);

impl<'a> Declaration<'a> for InterfaceDecl<'a> {}

impl<'a> InterfaceDecl<'a> {
    child_images_method!(parent_interfaces, ParentClass);
    children_method!(methods, MethodDecl);
    children_method!(constants, ConstantDecl);
}

ast_node!(FunctionDecl, NodeKind::Function);

impl<'a> Declaration<'a> for FunctionDecl<'a> {}

impl<'a> FunctionDecl<'a> {
    children_method!(parameters, Parameter);

    pub fn body(&self) -> Option<&'a Node> {
        self.0.first_child(NodeKind::Block)
    }
}

ast_node!(MethodDecl, NodeKind::Method);

impl<'a> Declaration<'a> for MethodDecl<'a> {}

impl<'a> MethodDecl<'a> {
    children_method!(parameters, Parameter);

    pub fn modifiers(&self) -> Modifiers {
        self.0.modifiers()
    }

    /// `None` for abstract and interface methods.
    pub fn body(&self) -> Option<&'a Node> {
        self.0.first_child(NodeKind::Block)
    }
}

ast_node!(PropertyDecl, NodeKind::Property);

impl<'a> Declaration<'a> for PropertyDecl<'a> {}

ast_node!(ConstantDecl, NodeKind::Constant);

impl<'a> Declaration<'a> for ConstantDecl<'a> {}

ast_node!(
    /// A formal parameter; the image is the variable name including `$`.
    Parameter,
    NodeKind::Parameter
);

impl<'a> Parameter<'a> {
    pub fn name(&self) -> &'a str {
        self.0.image()
    }

    pub fn type_hint(&self) -> Option<&'a str> {
        self.0.first_child(NodeKind::TypeHint).map(|n| n.image())
    }
}

ast_node!(Literal, NodeKind::Literal(_));

impl<'a> Literal<'a> {
    pub fn kind(&self) -> LiteralKind {
        match self.0.kind() {
            NodeKind::Literal(kind) => kind,
            _ => unreachable!("Literal wraps only literal nodes"),
        }
    }

    /// The literal exactly as scanned, e.g. `True`, `0x2A`, `'foo'`.
    pub fn image(&self) -> &'a str {
        self.0.image()
    }
}

ast_node!(
    /// `cond ? then : else`, or the short form `cond ?: else`.
    ConditionalExpression,
    NodeKind::ConditionalExpression
);

impl<'a> ConditionalExpression<'a> {
    pub fn is_short(&self) -> bool {
        self.0.image() == "?:"
    }

    pub fn condition(&self) -> &'a Node {
        &self.0.children()[0]
    }

    /// `None` for the short form.
    pub fn then_branch(&self) -> Option<&'a Node> {
        if self.is_short() {
            None
        } else {
            self.0.children().get(1)
        }
    }

    pub fn else_branch(&self) -> &'a Node {
        let children = self.0.children();
        &children[children.len() - 1]
    }
}

ast_node!(ThrowStatement, NodeKind::Throw);

impl<'a> ThrowStatement<'a> {
    pub fn expression(&self) -> Option<&'a Node> {
        self.0.children().first()
    }

    /// Class name of a `throw new Name(...)` statement.
    pub fn thrown_class(&self) -> Option<&'a str> {
        self.expression()
            .and_then(Allocation::cast)
            .and_then(|allocation| allocation.class_name())
    }
}

ast_node!(Allocation, NodeKind::Allocation);

impl<'a> Allocation<'a> {
    /// The instantiated class when it is named statically.
    pub fn class_name(&self) -> Option<&'a str> {
        self.0
            .children()
            .first()
            .filter(|n| n.kind() == NodeKind::Identifier)
            .map(|n| n.image())
    }
}
