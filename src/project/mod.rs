pub mod file_loader;
mod filter;

pub use file_loader::{collect_file_paths, load_file};
pub use filter::{CompositeFilter, ExcludePathFilter, ExtensionFilter, FileFilter};
