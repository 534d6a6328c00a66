//! Typed settings and partial overrides.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::base::constants::DEFAULT_NESTING_LIMIT;

/// Storage backend of the parse cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheDriver {
    Memory,
    #[default]
    File,
}

impl FromStr for CacheDriver {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheDriver::Memory),
            "file" => Ok(CacheDriver::File),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CacheDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheDriver::Memory => "memory",
            CacheDriver::File => "file",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub driver: CacheDriver,
    pub location: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            driver: CacheDriver::default(),
            location: std::env::temp_dir().join("depend-cache"),
        }
    }
}

/// Rendering options, carried for other consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConvertSettings {
    pub font_family: String,
    pub font_size: f32,
}

impl Default for ImageConvertSettings {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 11.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParserSettings {
    /// Maximum recursion depth of the parser.
    pub nesting: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            nesting: DEFAULT_NESTING_LIMIT,
        }
    }
}

/// Complete settings of an analysis run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub image_convert: ImageConvertSettings,
    pub parser: ParserSettings,
}

impl Settings {
    /// These settings with every field present in `patch` replaced.
    pub fn overlay(&self, patch: &SettingsPatch) -> Settings {
        let mut merged = self.clone();
        if let Some(driver) = patch.cache_driver {
            merged.cache.driver = driver;
        }
        if let Some(location) = &patch.cache_location {
            merged.cache.location = location.clone();
        }
        if let Some(family) = &patch.font_family {
            merged.image_convert.font_family = family.clone();
        }
        if let Some(size) = patch.font_size {
            merged.image_convert.font_size = size;
        }
        if let Some(nesting) = patch.parser_nesting {
            merged.parser.nesting = nesting;
        }
        merged
    }
}

/// A partial override; `None` keeps the underlying value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsPatch {
    pub cache_driver: Option<CacheDriver>,
    pub cache_location: Option<PathBuf>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub parser_nesting: Option<usize>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}
