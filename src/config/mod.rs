//! Analysis settings
//!
//! Defaults come from [`Settings::default`]; XML override files are read
//! with [`ConfigurationParser`] and overlaid field by field. The core only
//! consumes `parser.nesting`; cache fields select the parse cache and image
//! fields are carried for other consumers.

mod error;
mod parser;
mod probe;
mod settings;

pub use error::ConfigError;
pub use parser::{ConfigurationParser, read_patch};
pub use probe::{CapabilityProbe, HostCapabilities};
pub use settings::{CacheDriver, CacheSettings, ImageConvertSettings, ParserSettings, Settings, SettingsPatch};
