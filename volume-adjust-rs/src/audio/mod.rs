//! Audio module for Windows Core Audio API interactions.
//!
//! This module provides device enumeration, per-application session
//! lookup, and a uniform volume/mute contract over both.

pub mod control;
pub mod device;
#[cfg(windows)]
pub mod enumerator;
pub mod hidden;
pub mod registry;
pub mod sessions;
pub mod system;
#[cfg(windows)]
pub mod volume;

#[cfg(test)]
pub(crate) mod fake;

pub use control::{ControlKind, NullControl, VolumeControl};
pub use device::{AudioError, Endpoint};
#[cfg(windows)]
pub use enumerator::{ComGuard, WindowsAudioSystem};
pub use hidden::{HiddenSet, HiddenSetFilter};
pub use registry::DeviceRegistry;
pub use sessions::SessionResolver;
pub use system::{AudioSystem, EndpointDescriptor, SessionDescriptor};
