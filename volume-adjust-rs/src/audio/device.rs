//! Audio endpoint data model.
//!
//! Defines the endpoint record published by the device registry and the
//! error type shared by the audio layer.

use super::control::VolumeControl;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// An output device as seen by navigation.
///
/// Immutable once built; the registry replaces the whole set on refresh.
#[derive(Clone)]
pub struct Endpoint {
    /// Stable native device ID (opaque string from IMMDevice::GetId)
    pub id: String,

    /// Human-readable device name (from device properties)
    pub name: String,

    /// Whether this is the system default output device
    pub is_default: bool,

    /// Volume and mute control for the device
    pub control: Arc<dyn VolumeControl>,
}

impl Endpoint {
    pub fn new(id: String, name: String, control: Arc<dyn VolumeControl>) -> Self {
        Self {
            id,
            name,
            is_default: false,
            control,
        }
    }

    /// Mark this endpoint as the system default.
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("is_default", &self.is_default)
            .field("control", &self.control.kind())
            .finish()
    }
}

/// Audio service error types.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The native handle behind a control was invalidated (device
    /// unplugged, process exited).
    #[error("Volume control is no longer available")]
    ControlUnavailable,

    #[error("Endpoint index {index} out of range ({count} endpoints)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Failed to enumerate audio endpoints: {0}")]
    EnumerationFailed(String),

    #[cfg(windows)]
    #[error("COM initialization failed: {0}")]
    ComInitFailed(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsError(#[source] windows::core::Error),

    #[error("String conversion error: {0}")]
    StringConversion(String),
}

impl AudioError {
    /// True for errors that mean "the source went away" rather than a fault.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AudioError::ControlUnavailable)
    }
}
