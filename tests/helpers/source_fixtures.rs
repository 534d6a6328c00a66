//! Common source code fixtures for tests.

pub const CLASS_AND_INTERFACE: &str = r#"<?php
namespace pdepend\test;

class Foo implements Bar
{
    public function run() {}
}

interface Bar
{
    function run();
}
"#;

pub const ANNOTATED_FUNCTION: &str = r#"<?php
/**
 * @package pdepend.test
 * @throws RuntimeException
 */
function foo()
{
}

/**
 * @package pdepend.test2
 */
class Baz
{
}
"#;

pub const PACKAGE_A: &str = r#"<?php
namespace package1;

class A {}
class B {}
interface I {}
function f() {}
"#;

pub const PACKAGE_B: &str = r#"<?php
namespace package2;

class C extends \package1\A {}
interface J extends \package1\I {}
"#;

pub const PACKAGE_C: &str = r#"<?php
namespace package3;

abstract class D
{
    /**
     * @throws \package1\Failure
     */
    abstract public function run();

    public function stop()
    {
        throw new Halted();
    }
}
"#;

pub const CONDITIONAL_EXPRESSION: &str = r#"<?php
function testConditionalExpression()
{
    $variables = $x ? 1 : 2;
}
"#;

pub const UNCLOSED_DOUBLE_QUOTE: &str = r#"<?php
function testUnclosedDoubleQuoteStringResultsInExpectedException()
{
    return "Hello;
}
"#;
