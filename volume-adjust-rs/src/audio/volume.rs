//! Volume control using IAudioEndpointVolume and ISimpleAudioVolume.
//!
//! Provides volume and mute control for audio devices and sessions.

use super::control::{ControlKind, VolumeControl};
use super::device::AudioError;
use windows::Win32::Media::Audio::{
    Endpoints::IAudioEndpointVolume, IMMDevice, ISimpleAudioVolume, AUDCLNT_E_DEVICE_INVALIDATED,
};
use windows::Win32::System::Com::CLSCTX_ALL;

fn control_error(e: windows::core::Error) -> AudioError {
    if e.code() == AUDCLNT_E_DEVICE_INVALIDATED {
        AudioError::ControlUnavailable
    } else {
        AudioError::WindowsError(e)
    }
}

/// Volume controller for a device endpoint.
pub struct EndpointVolumeController {
    endpoint_volume: IAudioEndpointVolume,
}

// MMDevice API objects are free-threaded.
unsafe impl Send for EndpointVolumeController {}
unsafe impl Sync for EndpointVolumeController {}

impl EndpointVolumeController {
    /// Create a new EndpointVolumeController for the given device.
    pub fn new(device: &IMMDevice) -> Result<Self, AudioError> {
        unsafe {
            let endpoint_volume: IAudioEndpointVolume = device
                .Activate(CLSCTX_ALL, None)
                .map_err(control_error)?;

            Ok(Self { endpoint_volume })
        }
    }
}

impl VolumeControl for EndpointVolumeController {
    fn kind(&self) -> ControlKind {
        ControlKind::Device
    }

    fn get_volume(&self) -> Result<f32, AudioError> {
        unsafe {
            self.endpoint_volume
                .GetMasterVolumeLevelScalar()
                .map_err(control_error)
        }
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        let level = level.clamp(0.0, 1.0);
        unsafe {
            self.endpoint_volume
                .SetMasterVolumeLevelScalar(level, std::ptr::null())
                .map_err(control_error)
        }
    }

    fn get_mute(&self) -> Result<bool, AudioError> {
        unsafe {
            let muted = self.endpoint_volume.GetMute().map_err(control_error)?;
            Ok(muted.as_bool())
        }
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        unsafe {
            self.endpoint_volume
                .SetMute(muted, std::ptr::null())
                .map_err(control_error)
        }
    }
}

/// Volume controller for one application's audio session.
pub struct SessionVolumeController {
    simple_volume: ISimpleAudioVolume,
}

// Session controls come from the same free-threaded audio service.
unsafe impl Send for SessionVolumeController {}
unsafe impl Sync for SessionVolumeController {}

impl SessionVolumeController {
    pub fn new(simple_volume: ISimpleAudioVolume) -> Self {
        Self { simple_volume }
    }
}

impl VolumeControl for SessionVolumeController {
    fn kind(&self) -> ControlKind {
        ControlKind::Session
    }

    fn get_volume(&self) -> Result<f32, AudioError> {
        unsafe { self.simple_volume.GetMasterVolume().map_err(control_error) }
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        let level = level.clamp(0.0, 1.0);
        unsafe {
            self.simple_volume
                .SetMasterVolume(level, std::ptr::null())
                .map_err(control_error)
        }
    }

    fn get_mute(&self) -> Result<bool, AudioError> {
        unsafe {
            let muted = self.simple_volume.GetMute().map_err(control_error)?;
            Ok(muted.as_bool())
        }
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        unsafe {
            self.simple_volume
                .SetMute(muted, std::ptr::null())
                .map_err(control_error)
        }
    }
}
