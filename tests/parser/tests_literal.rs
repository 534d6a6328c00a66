//! Parser Tests - Literals
//!
//! Literal recognition dispatches on the token kind; the image is the
//! scanned text, so casing and number notation survive.

use rstest::rstest;

use depend::parser::{AstNode, Literal, LiteralKind, NodeKind, ParseError, parse};

use crate::helpers::node_helpers::{first_node_of_kind_in_function, in_function, parse_ok};
use crate::helpers::source_fixtures::UNCLOSED_DOUBLE_QUOTE;

fn first_literal(body: &str) -> (LiteralKind, String) {
    let source = in_function("testLiteral", body);
    let parsed = parse_ok(&source);
    let node = parsed
        .syntax()
        .descendants()
        .find_map(Literal::cast)
        .unwrap_or_else(|| panic!("no literal in {body}"));
    (node.kind(), node.image().to_string())
}

#[rstest]
#[case("return True;", LiteralKind::Boolean, "True")]
#[case("return false;", LiteralKind::Boolean, "false")]
#[case("return FALSE;", LiteralKind::Boolean, "FALSE")]
#[case("return 42;", LiteralKind::Integer, "42")]
#[case("return 0x2A;", LiteralKind::Integer, "0x2A")]
#[case("return 0b101;", LiteralKind::Integer, "0b101")]
#[case("return 42.23;", LiteralKind::Float, "42.23")]
#[case("return 1e3;", LiteralKind::Float, "1e3")]
#[case("return .5;", LiteralKind::Float, ".5")]
#[case("return NULL;", LiteralKind::Null, "NULL")]
#[case("return 'single';", LiteralKind::String, "'single'")]
#[case(r#"return "double \" quote";"#, LiteralKind::String, r#""double \" quote""#)]
fn test_literal_image(#[case] body: &str, #[case] kind: LiteralKind, #[case] image: &str) {
    assert_eq!(first_literal(body), (kind, image.to_string()));
}

#[rstest]
#[case("return -42;", "-", "42")]
#[case("return +42;", "+", "42")]
#[case("return -42.23;", "-", "42.23")]
#[case("return +42.23;", "+", "42.23")]
fn test_signed_number_is_unary_over_unsigned_literal(
    #[case] body: &str,
    #[case] sign: &str,
    #[case] image: &str,
) {
    let source = in_function("testSigned", body);
    let parsed = parse_ok(&source);
    let unary = first_node_of_kind_in_function(&parsed, "testSigned", NodeKind::UnaryExpression);
    assert_eq!(unary.image(), sign);

    let literal = Literal::cast(&unary.children()[0]).expect("operand is a literal");
    assert_eq!(literal.image(), image);
}

#[test]
fn test_signed_literal_span_excludes_sign() {
    let source = in_function("testSigned", "return -42;");
    let parsed = parse_ok(&source);
    let unary = first_node_of_kind_in_function(&parsed, "testSigned", NodeKind::UnaryExpression);
    let literal = &unary.children()[0];

    assert_eq!((unary.span().start_line(), unary.span().start_column()), (4, 12));
    assert_eq!((literal.span().start_column(), literal.span().end_column()), (13, 14));
}

#[test]
fn test_unclosed_double_quote_ends_token_stream() {
    let err = parse(UNCLOSED_DOUBLE_QUOTE).unwrap_err();
    assert!(
        matches!(err, ParseError::TokenStreamEnd { .. }),
        "expected TokenStreamEnd, got {err:?}"
    );
}
