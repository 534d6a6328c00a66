//! Lookups into parsed trees.

use depend::parser::{AstNode, Declaration, FunctionDecl, Node, NodeKind, Parse, parse};

/// Parse `source`, panicking with the error on failure.
pub fn parse_ok(source: &str) -> Parse {
    match parse(source) {
        Ok(parsed) => parsed,
        Err(err) => panic!("failed to parse: {err}\n{source}"),
    }
}

/// The first node of `kind` inside the function named `function`.
pub fn first_node_of_kind_in_function<'a>(parsed: &'a Parse, function: &str, kind: NodeKind) -> &'a Node {
    let decl = parsed
        .syntax()
        .descendants()
        .filter_map(FunctionDecl::cast)
        .find(|f| f.name() == function)
        .unwrap_or_else(|| panic!("no function named {function}"));
    decl.syntax()
        .first_descendant(kind)
        .unwrap_or_else(|| panic!("no {kind:?} in {function}"))
}

/// Wrap `body` in a function named `name`, starting at line 2.
pub fn in_function(name: &str, body: &str) -> String {
    format!("<?php\nfunction {name}()\n{{\n    {body}\n}}\n")
}
