//! Parser Tests - Conditional expressions

use depend::parser::{AstNode, ConditionalExpression, NodeKind};

use crate::helpers::node_helpers::{first_node_of_kind_in_function, in_function, parse_ok};
use crate::helpers::source_fixtures::CONDITIONAL_EXPRESSION;

#[test]
fn test_conditional_expression_has_expected_start_line() {
    let parsed = parse_ok(CONDITIONAL_EXPRESSION);
    let node = first_node_of_kind_in_function(
        &parsed,
        "testConditionalExpression",
        NodeKind::ConditionalExpression,
    );
    assert_eq!(node.span().start_line(), 4);
}

#[test]
fn test_conditional_expression_has_expected_start_column() {
    let parsed = parse_ok(CONDITIONAL_EXPRESSION);
    let node = first_node_of_kind_in_function(
        &parsed,
        "testConditionalExpression",
        NodeKind::ConditionalExpression,
    );
    assert_eq!(node.span().start_column(), 18);
}

#[test]
fn test_conditional_expression_has_expected_end() {
    let parsed = parse_ok(CONDITIONAL_EXPRESSION);
    let node = first_node_of_kind_in_function(
        &parsed,
        "testConditionalExpression",
        NodeKind::ConditionalExpression,
    );
    assert_eq!(node.span().end_line(), 4);
    assert_eq!(node.span().end_column(), 27);
}

#[test]
fn test_conditional_binds_looser_than_its_condition() {
    let source = in_function("f", "$a = $b || $c ? $d : $e;");
    let parsed = parse_ok(&source);
    let node = first_node_of_kind_in_function(&parsed, "f", NodeKind::ConditionalExpression);
    let conditional = ConditionalExpression::cast(node).unwrap();

    assert_eq!(conditional.condition().kind(), NodeKind::BinaryExpression);
    assert_eq!(conditional.condition().image(), "||");
    assert_eq!(conditional.then_branch().unwrap().image(), "$d");
    assert_eq!(conditional.else_branch().image(), "$e");
}

#[test]
fn test_conditional_binds_tighter_than_assignment() {
    let source = in_function("f", "$a = $b ? $c : $d;");
    let parsed = parse_ok(&source);
    let assignment = first_node_of_kind_in_function(&parsed, "f", NodeKind::Assignment);
    assert_eq!(assignment.children()[0].image(), "$a");
    assert_eq!(assignment.children()[1].kind(), NodeKind::ConditionalExpression);
}

#[test]
fn test_multiline_conditional_span() {
    let source = "<?php
function f()
{
    return $a
        ? foo()
        : bar($b);
}
";
    let parsed = parse_ok(source);
    let node = first_node_of_kind_in_function(&parsed, "f", NodeKind::ConditionalExpression);
    let span = node.span();
    assert_eq!((span.start_line(), span.start_column()), (4, 12));
    assert_eq!((span.end_line(), span.end_column()), (6, 17));
}

#[test]
fn test_short_conditional_span() {
    let source = in_function("f", "return $a ?: $b;");
    let parsed = parse_ok(&source);
    let node = first_node_of_kind_in_function(&parsed, "f", NodeKind::ConditionalExpression);
    let conditional = ConditionalExpression::cast(node).unwrap();

    assert!(conditional.is_short());
    assert_eq!(node.span().start_column(), 12);
    assert_eq!(node.span().end_column(), 19);
}

#[test]
fn test_nested_conditional_in_else_branch() {
    let source = in_function("f", "return $a ? 1 : ($b ? 2 : 3);");
    let parsed = parse_ok(&source);
    let outer = first_node_of_kind_in_function(&parsed, "f", NodeKind::ConditionalExpression);
    let inner = outer
        .first_descendant(NodeKind::ConditionalExpression)
        .unwrap();
    assert!(outer.span().contains(inner.span().start));
    assert!(outer.span().contains(inner.span().end));
}
