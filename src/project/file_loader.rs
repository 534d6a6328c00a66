mod collection;
mod reading;

// Re-export core file loading functions (no parser dependencies)
pub use collection::collect_file_paths;
pub use reading::{get_extension, load_file};
