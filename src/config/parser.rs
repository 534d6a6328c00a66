//! XML configuration overrides.
//!
//! ```xml
//! <depend>
//!   <cache>
//!     <driver>memory</driver>
//!     <location>/var/cache/depend</location>
//!   </cache>
//!   <imageConvert>
//!     <fontFamily>Courier</fontFamily>
//!     <fontSize>14</fontSize>
//!   </imageConvert>
//!   <parser>
//!     <nesting>512</nesting>
//!   </parser>
//! </depend>
//! ```
//!
//! Elements are matched by their parent and own name, so the root element
//! name is not significant. Unknown elements are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::ConfigError;
use super::probe::{CapabilityProbe, HostCapabilities};
use super::settings::{CacheDriver, Settings, SettingsPatch};

/// Overlays override files onto a settings value.
///
/// Successive [`parse`](Self::parse) calls accumulate: a later file
/// replaces only the fields it sets.
pub struct ConfigurationParser {
    settings: Settings,
    probe: Box<dyn CapabilityProbe>,
}

impl ConfigurationParser {
    pub fn new(settings: Settings) -> Self {
        Self::with_probe(settings, HostCapabilities)
    }

    pub fn with_probe(settings: Settings, probe: impl CapabilityProbe + 'static) -> Self {
        Self {
            settings,
            probe: Box::new(probe),
        }
    }

    /// Read an override file and overlay it onto the current settings.
    pub fn parse(&mut self, path: &Path) -> Result<&Settings, ConfigError> {
        let xml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "reading configuration override");
        self.parse_str(&xml)
    }

    pub fn parse_str(&mut self, xml: &str) -> Result<&Settings, ConfigError> {
        let mut patch = read_patch(xml)?;
        if let Some(reason) = self.probe.serialization_defect() {
            tracing::warn!(%reason, "forcing in-memory cache driver");
            patch.cache_driver = Some(CacheDriver::Memory);
            patch.cache_location = None;
        }
        self.settings = self.settings.overlay(&patch);
        Ok(&self.settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}

impl Default for ConfigurationParser {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// Read the fields an override document sets.
pub fn read_patch(xml: &str) -> Result<SettingsPatch, ConfigError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut patch = SettingsPatch::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => path.push(element_name(e)?),
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(ref text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| ConfigError::xml(e.to_string()))?;
                apply(&mut patch, &path, value.trim())?;
            }
            Ok(Event::CData(data)) => {
                let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                apply(&mut patch, &path, value.trim())?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConfigError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    Ok(patch)
}

fn element_name(e: &BytesStart<'_>) -> Result<String, ConfigError> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| ConfigError::xml(e.to_string()))
}

fn apply(patch: &mut SettingsPatch, path: &[String], value: &str) -> Result<(), ConfigError> {
    let [.., section, field] = path else {
        return Ok(());
    };
    match (section.as_str(), field.as_str()) {
        ("cache", "driver") => {
            let driver = value
                .parse()
                .map_err(|()| ConfigError::invalid_value(field, value))?;
            patch.cache_driver = Some(driver);
        }
        ("cache", "location") => patch.cache_location = Some(PathBuf::from(value)),
        ("imageConvert", "fontFamily") => patch.font_family = Some(value.to_string()),
        ("imageConvert", "fontSize") => {
            let size = value
                .parse::<f32>()
                .ok()
                .filter(|size| size.is_finite() && *size > 0.0)
                .ok_or_else(|| ConfigError::invalid_value(field, value))?;
            patch.font_size = Some(size);
        }
        ("parser", "nesting") => {
            let nesting = value
                .parse::<usize>()
                .ok()
                .filter(|nesting| *nesting > 0)
                .ok_or_else(|| ConfigError::invalid_value(field, value))?;
            patch.parser_nesting = Some(nesting);
        }
        _ => {}
    }
    Ok(())
}
