//! Device and session enumeration using the Windows MMDevice API.
//!
//! Provides COM initialization and the native [`AudioSystem`].

use super::control::VolumeControl;
use super::device::AudioError;
use super::system::{AudioSystem, EndpointDescriptor, SessionDescriptor};
use super::volume::{EndpointVolumeController, SessionVolumeController};
use std::sync::Arc;
use tracing::debug;
use windows::core::{Interface, PWSTR};
use windows::Win32::Devices::Properties::DEVPKEY_Device_FriendlyName;
use windows::Win32::Foundation::{CloseHandle, MAX_PATH, RPC_E_CHANGED_MODE};
use windows::Win32::Media::Audio::{
    eMultimedia, eRender, AudioSessionStateExpired, IAudioSessionControl2,
    IAudioSessionManager2, IMMDevice, IMMDeviceEnumerator, ISimpleAudioVolume,
    MMDeviceEnumerator, DEVICE_STATE_ACTIVE,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, CLSCTX_ALL,
    COINIT_MULTITHREADED, STGM,
};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::Shell::PropertiesSystem::{IPropertyStore, PROPERTYKEY};

/// COM initialization guard that uninitializes COM on drop.
pub struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    /// Join the multithreaded apartment on the current thread.
    ///
    /// A thread already in another apartment is left as it is.
    pub fn new() -> Result<Self, AudioError> {
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            return Ok(Self { initialized: false });
        }
        hr.ok().map_err(AudioError::ComInitFailed)?;
        Ok(Self { initialized: true })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe {
                CoUninitialize();
            }
        }
    }
}

/// Take ownership of a COM-allocated wide string.
unsafe fn take_pwstr(value: PWSTR) -> Result<String, AudioError> {
    let text = value
        .to_string()
        .map_err(|e| AudioError::StringConversion(e.to_string()));
    CoTaskMemFree(Some(value.0 as *const _));
    text
}

/// Native audio system backed by Core Audio.
///
/// COM objects are created per call so any thread may query it.
#[derive(Debug, Default)]
pub struct WindowsAudioSystem;

impl WindowsAudioSystem {
    pub fn new() -> Self {
        Self
    }

    fn enumerator(&self) -> Result<IMMDeviceEnumerator, AudioError> {
        unsafe {
            CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                .map_err(AudioError::WindowsError)
        }
    }

    fn describe(&self, device: &IMMDevice) -> Result<EndpointDescriptor, AudioError> {
        unsafe {
            let id = take_pwstr(device.GetId().map_err(AudioError::WindowsError)?)?;
            let name = self
                .get_device_name(device)
                .unwrap_or_else(|| "Unknown".to_string());
            let control: Arc<dyn VolumeControl> = Arc::new(EndpointVolumeController::new(device)?);

            Ok(EndpointDescriptor { id, name, control })
        }
    }

    /// Get the friendly name of a device from its property store.
    fn get_device_name(&self, device: &IMMDevice) -> Option<String> {
        unsafe {
            let props: IPropertyStore = device.OpenPropertyStore(STGM(0)).ok()?;
            let key = PROPERTYKEY {
                fmtid: DEVPKEY_Device_FriendlyName.fmtid,
                pid: DEVPKEY_Device_FriendlyName.pid,
            };
            let name = props.GetValue(&key).ok()?.to_string();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        }
    }

    fn default_device(&self, enumerator: &IMMDeviceEnumerator) -> Option<IMMDevice> {
        unsafe { enumerator.GetDefaultAudioEndpoint(eRender, eMultimedia).ok() }
    }
}

impl AudioSystem for WindowsAudioSystem {
    fn active_endpoints(&self) -> Result<Vec<EndpointDescriptor>, AudioError> {
        let _com = ComGuard::new()?;
        let enumerator = self.enumerator()?;
        unsafe {
            let collection = enumerator
                .EnumAudioEndpoints(eRender, DEVICE_STATE_ACTIVE)
                .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;
            let count = collection
                .GetCount()
                .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;

            let mut endpoints = Vec::with_capacity(count as usize);
            for i in 0..count {
                let device = collection
                    .Item(i)
                    .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;
                match self.describe(&device) {
                    Ok(endpoint) => endpoints.push(endpoint),
                    Err(e) => debug!(error = %e, "Skipping endpoint without volume control"),
                }
            }

            Ok(endpoints)
        }
    }

    fn default_endpoint(&self) -> Result<Option<EndpointDescriptor>, AudioError> {
        let _com = ComGuard::new()?;
        let enumerator = self.enumerator()?;
        match self.default_device(&enumerator) {
            Some(device) => self.describe(&device).map(Some),
            None => Ok(None),
        }
    }

    fn sessions(&self) -> Result<Vec<SessionDescriptor>, AudioError> {
        let _com = ComGuard::new()?;
        let enumerator = self.enumerator()?;
        let Some(device) = self.default_device(&enumerator) else {
            return Ok(Vec::new());
        };

        unsafe {
            let manager: IAudioSessionManager2 = device
                .Activate(CLSCTX_ALL, None)
                .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;
            let sessions = manager
                .GetSessionEnumerator()
                .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;
            let count = sessions
                .GetCount()
                .map_err(|e| AudioError::EnumerationFailed(e.to_string()))?;

            let mut result = Vec::new();
            for i in 0..count {
                let Ok(control) = sessions.GetSession(i) else {
                    continue;
                };
                if control.GetState().map_or(true, |s| s == AudioSessionStateExpired) {
                    continue;
                }
                let Ok(control2) = control.cast::<IAudioSessionControl2>() else {
                    continue;
                };
                let Some(process_name) = control2.GetProcessId().ok().and_then(process_name)
                else {
                    continue;
                };
                let Ok(simple_volume) = control.cast::<ISimpleAudioVolume>() else {
                    continue;
                };
                let display_name = control
                    .GetDisplayName()
                    .ok()
                    .and_then(|name| take_pwstr(name).ok())
                    .filter(|name| !name.is_empty());

                result.push(SessionDescriptor {
                    process_name,
                    display_name,
                    control: Arc::new(SessionVolumeController::new(simple_volume)),
                });
            }

            Ok(result)
        }
    }
}

/// Executable file name of a process, e.g. "app.exe".
fn process_name(pid: u32) -> Option<String> {
    if pid == 0 {
        return None;
    }

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid).ok()?;
        let mut buffer = [0u16; MAX_PATH as usize];
        let mut size = buffer.len() as u32;
        let queried = QueryFullProcessImageNameW(
            handle,
            PROCESS_NAME_WIN32,
            PWSTR(buffer.as_mut_ptr()),
            &mut size,
        );
        let _ = CloseHandle(handle);
        queried.ok()?;

        let full_path = String::from_utf16_lossy(&buffer[..size as usize]);
        full_path
            .rsplit('\\')
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}
