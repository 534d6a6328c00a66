//! Parser Tests - Expressions and statements
//!
//! Shapes of operator trees and acceptance of common constructs.

use rstest::rstest;

use depend::parser::{Node, NodeKind, parse};

use crate::helpers::node_helpers::{first_node_of_kind_in_function, in_function, parse_ok};

/// Render an expression tree as a parenthesized string of images.
fn shape(node: &Node) -> String {
    match node.children() {
        [] => node.image().to_string(),
        [operand] => format!("({}{})", node.image(), shape(operand)),
        [lhs, rhs] => format!("({} {} {})", shape(lhs), node.image(), shape(rhs)),
        children => {
            let parts: Vec<_> = children.iter().map(shape).collect();
            format!("({} {})", node.image(), parts.join(" "))
        }
    }
}

fn returned_expression(expression: &str) -> String {
    let source = in_function("f", &format!("return {expression};"));
    let parsed = parse_ok(&source);
    let ret = first_node_of_kind_in_function(&parsed, "f", NodeKind::Return);
    shape(&ret.children()[0])
}

#[rstest]
#[case("1 + 2 * 3", "(1 + (2 * 3))")]
#[case("1 - 2 - 3", "((1 - 2) - 3)")]
#[case("$a * $b % $c", "(($a * $b) % $c)")]
#[case("$a && $b || $c", "(($a && $b) || $c)")]
#[case("$a ?? $b ?? $c", "($a ?? ($b ?? $c))")]
#[case("$a == 1 && $b < 2", "(($a == 1) && ($b < 2))")]
#[case("!$a instanceof B", "(!($a instanceof B))")]
#[case("-2 ** 2", "(-(2 ** 2))")]
#[case("$a | $b ^ $c & $d", "($a | ($b ^ ($c & $d)))")]
#[case("1 << 2 + 3", "(1 << (2 + 3))")]
fn test_binary_precedence(#[case] expression: &str, #[case] expected: &str) {
    assert_eq!(returned_expression(expression), expected);
}

#[test]
fn test_assignment_is_right_associative() {
    let source = in_function("f", "$a = $b = 3;");
    let parsed = parse_ok(&source);
    let assignment = first_node_of_kind_in_function(&parsed, "f", NodeKind::Assignment);
    assert_eq!(shape(assignment), "($a = ($b = 3))");
}

#[test]
fn test_low_precedence_or_binds_looser_than_assignment() {
    let source = in_function("f", "$a = $b or $c;");
    let parsed = parse_ok(&source);
    let statement = first_node_of_kind_in_function(&parsed, "f", NodeKind::ExpressionStatement);
    assert_eq!(shape(&statement.children()[0]), "(($a = $b) or $c)");
}

#[test]
fn test_postfix_chain() {
    let source = in_function("f", "$this->items[0]->run(1, 2)::VERSION;");
    let parsed = parse_ok(&source);
    let statement = first_node_of_kind_in_function(&parsed, "f", NodeKind::ExpressionStatement);
    let access = &statement.children()[0];
    assert_eq!(access.kind(), NodeKind::StaticAccess);

    let call = &access.children()[0];
    assert_eq!(call.kind(), NodeKind::Call);
    assert_eq!(call.children()[1].kind(), NodeKind::Arguments);
    assert_eq!(call.children()[1].children().len(), 2);
}

#[test]
fn test_allocation_with_qualified_name() {
    let source = in_function("f", "return new \\app\\Model($a);");
    let parsed = parse_ok(&source);
    let allocation = first_node_of_kind_in_function(&parsed, "f", NodeKind::Allocation);
    assert_eq!(allocation.children()[0].image(), "\\app\\Model");
    assert_eq!(allocation.children()[1].kind(), NodeKind::Arguments);
}

#[test]
fn test_cast_expression() {
    let source = in_function("f", "return (INT) $a;");
    let parsed = parse_ok(&source);
    let cast = first_node_of_kind_in_function(&parsed, "f", NodeKind::CastExpression);
    assert_eq!(cast.image(), "int");
}

#[test]
fn test_parenthesized_variable_is_not_a_cast() {
    let source = in_function("f", "return ($a) + 1;");
    let parsed = parse_ok(&source);
    let ret = first_node_of_kind_in_function(&parsed, "f", NodeKind::Return);
    assert_eq!(ret.children()[0].kind(), NodeKind::BinaryExpression);
}

#[test]
fn test_include_takes_whole_expression() {
    assert_eq!(
        returned_expression("require_once __DIR__ . '/x.php'"),
        "(require_once(__DIR__ . '/x.php'))"
    );
}

#[test]
fn test_switch_cases() {
    let source = in_function("f", "switch ($a) { case 1: g(); break; default: h(); }");
    let parsed = parse_ok(&source);
    let switch = first_node_of_kind_in_function(&parsed, "f", NodeKind::Switch);
    let kinds: Vec<_> = switch.children().iter().map(Node::kind).collect();
    assert_eq!(kinds, vec![NodeKind::Variable, NodeKind::Case, NodeKind::DefaultCase]);

    let case = &switch.children()[1];
    assert_eq!(case.children().len(), 3);
    assert_eq!(case.children()[2].kind(), NodeKind::Break);
}

#[test]
fn test_static_variables_with_initializer() {
    let source = in_function("f", "static $n = 0, $m;");
    let parsed = parse_ok(&source);
    let statics = first_node_of_kind_in_function(&parsed, "f", NodeKind::StaticVariables);
    let shapes: Vec<_> = statics.children().iter().map(shape).collect();
    assert_eq!(shapes, vec!["($n = 0)", "$m"]);
}

#[test]
fn test_do_while_body_then_condition() {
    let source = in_function("f", "do { g(); } while ($a);");
    let parsed = parse_ok(&source);
    let do_while = first_node_of_kind_in_function(&parsed, "f", NodeKind::DoWhile);
    assert_eq!(do_while.children()[0].kind(), NodeKind::Block);
    assert_eq!(do_while.children()[1].image(), "$a");
}

#[rstest]
#[case("[1, 2, 'k' => 3]", 3)]
#[case("array(1, 2,)", 2)]
#[case("[]", 0)]
fn test_array_elements(#[case] expression: &str, #[case] count: usize) {
    let source = in_function("f", &format!("return {expression};"));
    let parsed = parse_ok(&source);
    let array = first_node_of_kind_in_function(&parsed, "f", NodeKind::Array);
    assert_eq!(array.children().len(), count);
}

#[rstest]
// Control flow
#[case("<?php if ($a) { f(); } elseif ($b) { g(); } else { h(); }")]
#[case("<?php if ($a) f(); else g();")]
#[case("<?php while ($i < 10) { $i++; }")]
#[case("<?php for ($i = 0, $j = 1; $i < 10; $i++) { continue; }")]
#[case("<?php for (;;) { break 2; }")]
#[case("<?php foreach ($items as $key => &$value) { echo $key, $value; }")]
#[case("<?php try { f(); } catch (A | B $e) { g(); } finally { h(); }")]
#[case("<?php switch ($a) { case 1: case 2: f(); break; case 3; default: g(); }")]
#[case("<?php switch ($a) {}")]
#[case("<?php do { $i++; } while ($i < 10);")]
#[case("<?php do $i++; while ($i < 10) ?>")]
// Declarations
#[case("<?php final class A extends B { use T; const X = 1; private ?int $y = null; }")]
#[case("<?php class A { public static function create(self $a, ...$rest): static { return new static(); } }")]
#[case("<?php class A { public function __construct(private int $x) {} }")]
#[case("<?php function &ref(array &$a = array()) { return $a; }")]
#[case("<?php interface A extends B, C { const X = 1; public function f(int|string $a): ?A; }")]
#[case("<?php const A = 1, B = 2;")]
#[case("<?php trait T { use U; private $x = 1; abstract public function f(): int; }")]
#[case("<?php function f() { global $a, $b; static $n = 0, $m; return ++$n; }")]
#[case("<?php class A { const DEFAULT = 1; public function print() { return self::DEFAULT; } }")]
// Expressions
#[case("<?php $f = function ($a) use (&$b) { return $a + $b; };")]
#[case("<?php $f = static function () {};")]
#[case("<?php $a ??= [];")]
#[case("<?php $a = clone $b;")]
#[case("<?php $a = @file('x');")]
#[case("<?php echo A::class, static::create(), $a->{$b};")]
#[case("<?php $a = namespace\\f();")]
#[case("<?php require_once __DIR__ . '/bootstrap.php';")]
#[case("<?php include 'a.php'; include_once('b.php'); require 'c.php';")]
#[case("<?php $config = require 'config.php';")]
#[case("<?php print 'x'; if (!print 'y') {}")]
#[case("<?php $a = <<<EOT\n  Hello {$name}\n  EOT;\n")]
#[case("<?php $a = <<<'EOT'\nraw $text\nEOT . 'tail';\n")]
// Markup
#[case("<html><?php echo 1 ?></html>")]
#[case("<?php echo 1; ?>trailing")]
#[case("<?php echo 1; // note ?><b>html</b>")]
#[case("<?php echo 1 # note ?>trailing")]
#[case("no code at all")]
fn test_constructs_parse(#[case] source: &str) {
    if let Err(err) = parse(source) {
        panic!("failed to parse {source}: {err}");
    }
}
