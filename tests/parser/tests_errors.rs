//! Parser Tests - Error outcomes
//!
//! Parsing has no recovery: the first error is the result for the file.

use rstest::rstest;

use depend::Position;
use depend::parser::{ParseError, parse, parse_with_nesting_limit};

#[rstest]
#[case("<?php class A {")]
#[case("<?php function f() { return 1")]
#[case("<?php $a = ")]
#[case("<?php if ($a) { echo 'x';")]
#[case("<?php $s = 'open")]
#[case("<?php /* open comment")]
#[case("<?php $a = <<<EOT\nnever closed\n")]
#[case("<?php switch ($a) { case 1: f();")]
fn test_truncated_input_ends_token_stream(#[case] source: &str) {
    let err = parse(source).unwrap_err();
    assert!(
        matches!(err, ParseError::TokenStreamEnd { .. }),
        "{source}: expected TokenStreamEnd, got {err:?}"
    );
}

#[test]
fn test_token_stream_end_reports_last_position() {
    let err = parse("<?php\nclass A {\n    public $x;").unwrap_err();
    assert_eq!(err, ParseError::TokenStreamEnd { position: Position::new(3, 14) });
}

#[test]
fn test_unterminated_string_reports_quote_position() {
    let err = parse("<?php\n$a = \"abc").unwrap_err();
    assert_eq!(err.position(), Position::new(2, 6));
}

#[rstest]
#[case("<?php class { }", 1, 13)]
#[case("<?php function f() { return 1 2; }", 1, 31)]
#[case("<?php $a = );", 1, 12)]
#[case("<?php\nclass A {\n    $x;\n}", 3, 5)]
fn test_syntax_error_position(#[case] source: &str, #[case] line: usize, #[case] column: usize) {
    let err = parse(source).unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }), "got {err:?}");
    assert_eq!(err.position(), Position::new(line, column));
}

#[test]
fn test_syntax_error_names_offending_token() {
    let err = parse("<?php function f() { return 1 2; }").unwrap_err();
    match err {
        ParseError::Syntax { found, expected, .. } => {
            assert_eq!(found, "'2'");
            assert_eq!(expected, "';'");
        }
        other => panic!("expected Syntax, got {other:?}"),
    }
}

#[test]
fn test_unexpected_character() {
    let err = parse("<?php $a = 1 ` 2;").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedCharacter { character: '`', .. }));
}

#[test]
fn test_nesting_limit() {
    let deep = format!("<?php $a = {}1{};", "(".repeat(40), ")".repeat(40));
    assert!(parse(&deep).is_ok());

    let err = parse_with_nesting_limit(&deep, 16).unwrap_err();
    assert!(matches!(err, ParseError::NestingLimit { limit: 16, .. }));
}

#[test]
fn test_error_display_includes_position() {
    let err = parse("<?php\n$a = );").unwrap_err();
    assert_eq!(err.to_string(), "2:6: unexpected ')', expected expression");
}
