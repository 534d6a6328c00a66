//! Domain constants shared across the pipeline.

/// Namespace that receives declarations from files that declare none.
pub const DEFAULT_NAMESPACE: &str = "+global";

/// Separator between namespace name segments.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Extensions accepted by [`ExtensionFilter::sources`](crate::project::ExtensionFilter::sources).
pub const SOURCE_EXTENSIONS: &[&str] = &["php", "php3", "php4", "php5", "phtml", "inc"];

/// Doc comment tag naming a thrown exception.
pub const THROWS_ANNOTATION: &str = "@throws";

/// Doc comment tag naming the owning package of an un-namespaced declaration.
pub const PACKAGE_ANNOTATION: &str = "@package";

/// Default recursion bound for the parser.
pub const DEFAULT_NESTING_LIMIT: usize = 256;

/// Stack reserved on a parser worker thread per level of the nesting limit.
pub const STACK_BYTES_PER_NESTING_LEVEL: usize = 128 * 1024;

/// Smallest stack a parser worker thread is started with.
pub const MIN_PARSER_STACK_SIZE: usize = 8 * 1024 * 1024;
