//! Uniform volume/mute contract over device and session controls.
//!
//! Device endpoints and per-application sessions expose different native
//! interfaces; both are normalised to a 0.0..=1.0 scalar here so callers
//! never branch on which one they hold.

use super::device::AudioError;

/// Which native surface a control drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Endpoint master volume (IAudioEndpointVolume)
    Device,

    /// Session master volume (ISimpleAudioVolume)
    Session,

    /// No live source behind it
    Null,
}

/// Volume and mute access for one audio source.
pub trait VolumeControl: Send + Sync {
    fn kind(&self) -> ControlKind;

    /// Current volume level (0.0 to 1.0).
    fn get_volume(&self) -> Result<f32, AudioError>;

    /// Set the volume level (0.0 to 1.0).
    ///
    /// Fails with [`AudioError::ControlUnavailable`] once the underlying
    /// handle has been invalidated.
    fn set_volume(&self, level: f32) -> Result<(), AudioError>;

    /// Current mute state.
    fn get_mute(&self) -> Result<bool, AudioError>;

    /// Set the mute state.
    fn set_mute(&self, muted: bool) -> Result<(), AudioError>;
}

/// Inert control used when no live session matches a selection.
///
/// Reads as level 0.0, unmuted; setters are accepted and ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullControl;

impl VolumeControl for NullControl {
    fn kind(&self) -> ControlKind {
        ControlKind::Null
    }

    fn get_volume(&self) -> Result<f32, AudioError> {
        Ok(0.0)
    }

    fn set_volume(&self, _level: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn get_mute(&self) -> Result<bool, AudioError> {
        Ok(false)
    }

    fn set_mute(&self, _muted: bool) -> Result<(), AudioError> {
        Ok(())
    }
}
