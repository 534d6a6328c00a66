/// Reports host defects that make persistent cache storage unsafe.
///
/// Consulted on every configuration override that is read; a reported
/// defect forces the in-memory cache driver whatever the override sets.
pub trait CapabilityProbe: Send + Sync {
    /// `Some(reason)` when serialized cache entries cannot be trusted.
    fn serialization_defect(&self) -> Option<String>;
}

/// The default probe: the host has no known defect.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCapabilities;

impl CapabilityProbe for HostCapabilities {
    fn serialization_defect(&self) -> Option<String> {
        None
    }
}
