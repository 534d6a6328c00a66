//! Parser Tests - Node positions
//!
//! Lines and columns are one-based; the end column is the last character of
//! the node's last token.

use depend::parser::{NodeKind, parse};
use depend::{Position, Span};

use crate::helpers::node_helpers::parse_ok;

const DECLARATIONS: &str = "<?php
namespace app;

/**
 * Doc
 */
abstract class Foo extends Bar
{
    public function run($a, $b = 1)
    {
        return $a;
    }
}
";

fn span_of(source: &str, kind: NodeKind) -> Span {
    let parsed = parse_ok(source);
    parsed
        .syntax()
        .first_descendant(kind)
        .unwrap_or_else(|| panic!("no {kind:?}"))
        .span()
}

#[test]
fn test_class_span_starts_at_modifier_not_doc_comment() {
    assert_eq!(span_of(DECLARATIONS, NodeKind::Class), Span::from_coords(7, 1, 13, 1));
}

#[test]
fn test_statement_namespace_spans_its_members() {
    assert_eq!(span_of(DECLARATIONS, NodeKind::Namespace), Span::from_coords(2, 1, 13, 1));
}

#[test]
fn test_method_span_runs_to_closing_brace() {
    assert_eq!(span_of(DECLARATIONS, NodeKind::Method), Span::from_coords(9, 5, 12, 5));
}

#[test]
fn test_parent_class_reference_span() {
    assert_eq!(span_of(DECLARATIONS, NodeKind::ParentClass), Span::from_coords(7, 28, 7, 30));
}

#[test]
fn test_parameter_span_includes_default_value() {
    let parsed = parse_ok(DECLARATIONS);
    let parameters: Vec<_> = parsed
        .syntax()
        .descendants()
        .filter(|n| n.kind() == NodeKind::Parameter)
        .collect();
    assert_eq!(parameters.len(), 2);
    assert_eq!(parameters[0].span(), Span::from_coords(9, 25, 9, 26));
    assert_eq!(parameters[1].span(), Span::from_coords(9, 29, 9, 34));
}

#[test]
fn test_return_span_includes_terminator() {
    assert_eq!(span_of(DECLARATIONS, NodeKind::Return), Span::from_coords(11, 9, 11, 18));
}

#[test]
fn test_code_after_markup_keeps_line_columns() {
    let source = "<p>\n<b><?php echo $a; ?></b>";
    assert_eq!(span_of(source, NodeKind::Echo), Span::from_coords(2, 10, 2, 17));
}

#[test]
fn test_crlf_line_endings() {
    let source = "<?php\r\nfunction f()\r\n{\r\n    return 1;\r\n}\r\n";
    assert_eq!(span_of(source, NodeKind::Function), Span::from_coords(2, 1, 5, 1));
    assert_eq!(span_of(source, NodeKind::Return), Span::from_coords(4, 5, 4, 13));
}

#[test]
fn test_multibyte_characters_count_as_one_column() {
    let source = "<?php $a = 'üü'; $b;";
    let parsed = parse_ok(source);
    let variables: Vec<_> = parsed
        .syntax()
        .descendants()
        .filter(|n| n.kind() == NodeKind::Variable)
        .collect();
    assert_eq!(variables[1].image(), "$b");
    assert_eq!(variables[1].span().start, Position::new(1, 18));
}

#[test]
fn test_empty_file_root_span() {
    let parsed = parse("").unwrap();
    assert_eq!(parsed.syntax().kind(), NodeKind::SourceFile);
    assert!(parsed.syntax().children().is_empty());
    assert_eq!(parsed.syntax().span().start, Position::default());
}
