//! Native audio API boundary.

use super::control::VolumeControl;
use super::device::AudioError;
use std::sync::Arc;

/// An active output endpoint as reported by the audio subsystem.
#[derive(Clone)]
pub struct EndpointDescriptor {
    pub id: String,
    pub name: String,
    pub control: Arc<dyn VolumeControl>,
}

/// A live per-process audio session.
#[derive(Clone)]
pub struct SessionDescriptor {
    /// Executable file name of the owning process (e.g. "app.exe")
    pub process_name: String,

    /// Display name the application set on its session, if any
    pub display_name: Option<String>,

    pub control: Arc<dyn VolumeControl>,
}

/// Enumeration of devices and sessions on the host.
///
/// Every call is a fresh query; implementations do not cache.
pub trait AudioSystem: Send + Sync {
    /// All active render endpoints, in native enumeration order.
    fn active_endpoints(&self) -> Result<Vec<EndpointDescriptor>, AudioError>;

    /// The default render endpoint for the multimedia role, if any.
    fn default_endpoint(&self) -> Result<Option<EndpointDescriptor>, AudioError>;

    /// Live sessions on the default render endpoint, in native order.
    fn sessions(&self) -> Result<Vec<SessionDescriptor>, AudioError>;
}
