//! Engine Tests - Discovery, analysis and queries over real directories

use std::fs;
use std::sync::Arc;

use depend::base::constants::DEFAULT_NESTING_LIMIT;
use depend::config::{CacheDriver, ConfigurationParser, Settings};
use depend::parser::ParseError;
use depend::project::{ExcludePathFilter, ExtensionFilter};
use depend::{Engine, EngineError, EngineState};

use crate::helpers::source_fixtures::{
    ANNOTATED_FUNCTION, CLASS_AND_INTERFACE, PACKAGE_A, PACKAGE_B, PACKAGE_C,
};
use crate::helpers::workspace::{Workspace, engine};

fn packages_workspace() -> Workspace {
    let ws = Workspace::new();
    ws.file("src/package1.php", PACKAGE_A);
    ws.file("src/package2.php", PACKAGE_B);
    ws.file("src/sub/package3.php", PACKAGE_C);
    ws
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_add_missing_directory_fails() {
    let ws = Workspace::new();
    let missing = ws.join("foo/bar");
    let err = engine().add_directory(&missing).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Invalid directory '{}' added.", missing.display())
    );
}

#[test]
fn test_add_directory_rejects_file() {
    let ws = Workspace::new();
    let file = ws.file("a.php", "<?php");
    let err = engine().add_directory(&file).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput { .. }));
}

#[test]
fn test_add_missing_file_fails() {
    let ws = Workspace::new();
    let err = engine().add_file(ws.join("missing.php")).unwrap_err();
    assert!(err.to_string().starts_with("Invalid file '"));
}

#[test]
fn test_analyze_without_input_fails() {
    let err = engine().analyze().unwrap_err();
    assert!(matches!(err, EngineError::NoInput));
    assert_eq!(err.to_string(), "No source directory and file set.");
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_count_classes_before_analyze_fails() {
    let ws = packages_workspace();
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();

    let err = engine.count_classes().unwrap_err();
    assert_eq!(
        err.to_string(),
        "count_classes() doesn't work before the source was analyzed."
    );
}

#[test]
fn test_get_unknown_package_fails() {
    let ws = packages_workspace();
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();
    engine.analyze().unwrap();

    let err = engine.get_package("package0").unwrap_err();
    assert_eq!(err.to_string(), "Unknown package \"package0\".");
}

#[test]
fn test_get_packages_returns_analyzed_registry() {
    let ws = packages_workspace();
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();

    let analyzed = engine.analyze().unwrap();
    let packages = engine.get_packages().unwrap();
    assert!(Arc::ptr_eq(&analyzed, &packages));
    assert_eq!(engine.state(), EngineState::Analyzed);
}

#[test]
fn test_counts_over_directory_tree() {
    let ws = packages_workspace();
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();
    engine.analyze().unwrap();

    assert_eq!(engine.count_packages().unwrap(), 3);
    assert_eq!(engine.count_classes().unwrap(), 4);
    assert_eq!(engine.count_interfaces().unwrap(), 2);
    assert_eq!(engine.count_functions().unwrap(), 1);

    let names: Vec<_> = engine.get_packages().unwrap().names().map(str::to_string).collect();
    assert_eq!(names, ["package1", "package2", "package3"]);
}

#[test]
fn test_class_exceptions_from_annotations_and_throw_statements() {
    let ws = packages_workspace();
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();
    engine.analyze().unwrap();

    let class = engine.get_package("package3").unwrap().class("D").unwrap();
    let exceptions: Vec<_> = class.exceptions().collect();
    assert_eq!(exceptions, ["package1\\Failure", "Halted"]);
}

#[test]
fn test_single_file_with_class_and_interface() {
    let ws = Workspace::new();
    let file = ws.file("code.php", CLASS_AND_INTERFACE);
    let mut engine = engine();
    engine.add_file(&file).unwrap();
    engine.analyze().unwrap();

    assert_eq!(engine.count_packages().unwrap(), 1);
    assert_eq!(engine.count_classes().unwrap(), 1);
    assert_eq!(engine.count_interfaces().unwrap(), 1);

    let package = engine.get_package("pdepend\\test").unwrap();
    assert!(package.class("Foo").is_some());
    assert!(package.interface("Bar").is_some());
}

#[test]
fn test_package_annotation_and_throws() {
    let ws = Workspace::new();
    let file = ws.file("functions.inc", ANNOTATED_FUNCTION);
    let mut engine = engine();
    engine.add_file(&file).unwrap();
    let registry = engine.analyze().unwrap();

    assert_eq!(registry.len(), 2);
    let first = registry.first().unwrap();
    assert_eq!(first.name(), "pdepend.test");
    assert_eq!(first.function("foo").unwrap().exceptions().count(), 1);
}

#[test]
fn test_without_annotations_drops_throws_but_keeps_packages() {
    let ws = Workspace::new();
    let file = ws.file("functions.inc", ANNOTATED_FUNCTION);
    let mut engine = engine();
    engine.add_file(&file).unwrap();
    engine.set_without_annotations();
    let registry = engine.analyze().unwrap();

    assert_eq!(registry.len(), 2);
    let first = registry.first().unwrap();
    assert_eq!(first.name(), "pdepend.test");
    assert_eq!(first.function("foo").unwrap().exceptions().count(), 0);
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_extension_filter() {
    let ws = packages_workspace();
    ws.file("src/notes.txt", "<?php class Hidden {}");
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();
    engine.add_file_filter(ExtensionFilter::new(["php"]));
    engine.analyze().unwrap();

    assert_eq!(engine.count_classes().unwrap(), 4);
}

#[test]
fn test_exclude_path_filter() {
    let ws = packages_workspace();
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();
    engine.add_file_filter(ExcludePathFilter::new(["/sub/"]));
    engine.analyze().unwrap();

    assert_eq!(engine.count_packages().unwrap(), 2);
    assert!(engine.get_package("package3").is_err());
}

#[test]
fn test_closure_filter() {
    let ws = packages_workspace();
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();
    engine.add_file_filter(|path: &std::path::Path| !path.ends_with("package2.php"));
    engine.analyze().unwrap();

    assert_eq!(engine.count_interfaces().unwrap(), 1);
}

// =============================================================================
// Failures and settings
// =============================================================================

#[test]
fn test_parse_error_names_file() {
    let ws = packages_workspace();
    let broken = ws.file("src/broken.php", "<?php\nclass {");
    let mut engine = engine();
    engine.add_directory(ws.path()).unwrap();

    let err = engine.analyze().unwrap_err();
    let canonical = fs::canonicalize(&broken).unwrap();
    assert_eq!(err.path(), Some(canonical.as_path()));
    assert!(err.to_string().ends_with("2:7: unexpected '{', expected identifier"));
    assert_eq!(engine.state(), EngineState::Configured);
}

#[test]
fn test_configuration_file_sets_nesting_limit() {
    let ws = Workspace::new();
    let deep = format!("<?php $a = {}1{};", "(".repeat(20), ")".repeat(20));
    ws.file("src/deep.php", &deep);
    let config = ws.file(
        "depend.xml",
        "<depend><cache><driver>memory</driver></cache><parser><nesting>8</nesting></parser></depend>",
    );

    let mut parser = ConfigurationParser::new(Settings::default());
    parser.parse(&config).unwrap();
    let settings = parser.into_settings();
    assert_eq!(settings.cache.driver, CacheDriver::Memory);

    let mut engine = Engine::with_settings(settings);
    engine.add_directory(ws.join("src")).unwrap();
    let err = engine.analyze().unwrap_err();
    assert!(matches!(err, EngineError::Parse { .. }), "got {err:?}");
}

#[test]
fn test_statement_forms_analyze() {
    let ws = Workspace::new();
    ws.file(
        "src/runtime.php",
        "<?php
namespace app;

require_once __DIR__ . '/bootstrap.php';

trait Greets
{
    public function greet() { print 'hi'; }
}

function dispatch($code)
{
    global $log;
    static $calls = 0;
    do {
        $calls++;
    } while ($calls < 2);
    switch ($code) {
        case 404:
            throw new NotFound(<<<EOT
                missing {$code}
                EOT);
        default:
            return include 'page.php'; // render ?>
<?php
    }
}
",
    );

    let mut engine = engine();
    engine.add_directory(ws.join("src")).unwrap();
    engine.analyze().unwrap();
    assert_eq!(engine.count_functions().unwrap(), 1);
    assert_eq!(engine.count_classes().unwrap(), 0);
    let package = engine.get_package("app").unwrap();
    let dispatch = &package.functions()[0];
    assert_eq!(dispatch.exceptions().collect::<Vec<_>>(), vec!["NotFound"]);
}

/// `$a = (((...1...)));` with `depth` parentheses. The statement, its
/// expression and the assignment's right-hand side take three nesting levels
/// before the first parenthesis.
fn parenthesized_assignment(depth: usize) -> String {
    format!("<?php $a = {}1{};", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn test_deepest_nesting_under_default_limit_analyzes() {
    let ws = Workspace::new();
    ws.file("src/deep.php", &parenthesized_assignment(DEFAULT_NESTING_LIMIT - 3));
    ws.file("src/package1.php", PACKAGE_A);

    let mut engine = engine();
    engine.add_directory(ws.join("src")).unwrap();
    engine.analyze().unwrap();
    assert_eq!(engine.state(), EngineState::Analyzed);
}

#[test]
fn test_nesting_past_default_limit_fails_without_overflow() {
    let ws = Workspace::new();
    ws.file("src/deep.php", &parenthesized_assignment(DEFAULT_NESTING_LIMIT - 2));

    let mut engine = engine();
    engine.add_directory(ws.join("src")).unwrap();
    let err = engine.analyze().unwrap_err();
    assert!(
        matches!(
            err,
            EngineError::Parse {
                source: ParseError::NestingLimit { limit: DEFAULT_NESTING_LIMIT, .. },
                ..
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn test_file_cache_from_settings() {
    let ws = packages_workspace();
    let cache_dir = ws.join("cache");
    let mut settings = Settings::default();
    settings.cache.driver = CacheDriver::File;
    settings.cache.location = cache_dir.clone();

    let mut engine = Engine::with_settings(settings.clone());
    engine.add_directory(ws.join("src")).unwrap();
    let first = engine.analyze().unwrap();
    assert_eq!(fs::read_dir(&cache_dir).unwrap().count(), 3);

    // A fresh engine over the same cache gives the same registry
    let mut second_engine = Engine::with_settings(settings);
    second_engine.add_directory(ws.join("src")).unwrap();
    let second = second_engine.analyze().unwrap();
    assert_eq!(*first, *second);
}
