//! In-memory audio system for tests.

use super::control::{ControlKind, VolumeControl};
use super::device::AudioError;
use super::system::{AudioSystem, EndpointDescriptor, SessionDescriptor};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct FakeControl {
    kind: ControlKind,
    volume: Mutex<f32>,
    muted: Mutex<bool>,
    invalidated: AtomicBool,
}

impl FakeControl {
    pub fn device(volume: f32, muted: bool) -> Arc<Self> {
        Self::with_kind(ControlKind::Device, volume, muted)
    }

    pub fn session(volume: f32, muted: bool) -> Arc<Self> {
        Self::with_kind(ControlKind::Session, volume, muted)
    }

    fn with_kind(kind: ControlKind, volume: f32, muted: bool) -> Arc<Self> {
        Arc::new(Self {
            kind,
            volume: Mutex::new(volume),
            muted: Mutex::new(muted),
            invalidated: AtomicBool::new(false),
        })
    }

    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
    }

    pub fn volume(&self) -> f32 {
        *self.volume.lock()
    }

    pub fn muted(&self) -> bool {
        *self.muted.lock()
    }

    fn check(&self) -> Result<(), AudioError> {
        if self.invalidated.load(Ordering::SeqCst) {
            Err(AudioError::ControlUnavailable)
        } else {
            Ok(())
        }
    }
}

impl VolumeControl for FakeControl {
    fn kind(&self) -> ControlKind {
        self.kind
    }

    fn get_volume(&self) -> Result<f32, AudioError> {
        self.check()?;
        Ok(self.volume())
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        self.check()?;
        *self.volume.lock() = level.clamp(0.0, 1.0);
        Ok(())
    }

    fn get_mute(&self) -> Result<bool, AudioError> {
        self.check()?;
        Ok(self.muted())
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        self.check()?;
        *self.muted.lock() = muted;
        Ok(())
    }
}

#[derive(Clone)]
struct FakeDevice {
    id: String,
    name: String,
    control: Arc<FakeControl>,
}

/// Scriptable device and session lists.
#[derive(Default)]
pub struct FakeAudioSystem {
    devices: Mutex<Vec<FakeDevice>>,
    default_id: Mutex<Option<String>>,
    extra_default: Mutex<Option<FakeDevice>>,
    sessions: Mutex<Vec<SessionDescriptor>>,
    fail_enumeration: AtomicBool,
}

impl FakeAudioSystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_device(&self, id: &str, name: &str, is_default: bool) -> Arc<FakeControl> {
        let control = FakeControl::device(0.5, false);
        self.devices.lock().push(FakeDevice {
            id: id.to_string(),
            name: name.to_string(),
            control: Arc::clone(&control),
        });
        if is_default {
            *self.default_id.lock() = Some(id.to_string());
        }
        control
    }

    /// A default device that does not show up in the active enumeration.
    pub fn set_unlisted_default(&self, id: &str, name: &str) -> Arc<FakeControl> {
        let control = FakeControl::device(0.5, false);
        *self.extra_default.lock() = Some(FakeDevice {
            id: id.to_string(),
            name: name.to_string(),
            control: Arc::clone(&control),
        });
        *self.default_id.lock() = Some(id.to_string());
        control
    }

    pub fn remove_device(&self, id: &str) {
        self.devices.lock().retain(|d| d.id != id);
    }

    pub fn add_session(&self, process_name: &str, display_name: Option<&str>) -> Arc<FakeControl> {
        let control = FakeControl::session(0.5, false);
        self.sessions.lock().push(SessionDescriptor {
            process_name: process_name.to_string(),
            display_name: display_name.map(str::to_string),
            control: control.clone(),
        });
        control
    }

    pub fn clear_sessions(&self) {
        self.sessions.lock().clear();
    }

    pub fn set_fail_enumeration(&self, fail: bool) {
        self.fail_enumeration.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), AudioError> {
        if self.fail_enumeration.load(Ordering::SeqCst) {
            Err(AudioError::EnumerationFailed("scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl FakeDevice {
    fn descriptor(&self) -> EndpointDescriptor {
        EndpointDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            control: self.control.clone(),
        }
    }
}

impl AudioSystem for FakeAudioSystem {
    fn active_endpoints(&self) -> Result<Vec<EndpointDescriptor>, AudioError> {
        self.check()?;
        Ok(self.devices.lock().iter().map(FakeDevice::descriptor).collect())
    }

    fn default_endpoint(&self) -> Result<Option<EndpointDescriptor>, AudioError> {
        self.check()?;
        let Some(default_id) = self.default_id.lock().clone() else {
            return Ok(None);
        };
        if let Some(extra) = self.extra_default.lock().as_ref() {
            if extra.id == default_id {
                return Ok(Some(extra.descriptor()));
            }
        }
        Ok(self
            .devices
            .lock()
            .iter()
            .find(|d| d.id == default_id)
            .map(FakeDevice::descriptor))
    }

    fn sessions(&self) -> Result<Vec<SessionDescriptor>, AudioError> {
        self.check()?;
        Ok(self.sessions.lock().clone())
    }
}
