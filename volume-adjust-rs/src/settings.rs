//! Model behind the settings panel.
//!
//! Keeps the list of devices and processes the user can hide, which of
//! them are checked, and the volume step. The widget toolkit only renders
//! this state and forwards button presses.

use crate::app::AppState;
use crate::commands::MAX_STEP_PERCENT;
use crate::platform::{JsonPreferences, PreferencesError, UserPreferences};
use std::collections::BTreeMap;
use std::thread::JoinHandle;
use tracing::warn;

/// One row of a checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Device ID or process name
    pub key: String,

    /// Text shown to the user
    pub label: String,

    /// Whether the entry is hidden from navigation
    pub checked: bool,
}

impl Choice {
    fn new(key: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            checked,
        }
    }
}

pub struct SettingsModel {
    store: JsonPreferences,
    step: u8,
    devices: Vec<Choice>,
    processes: Vec<Choice>,
}

impl SettingsModel {
    /// Populate the panel from the running application.
    pub fn load(app: &AppState, store: JsonPreferences) -> Self {
        let mut model = Self {
            store,
            step: clamp_step(app.preferences().step),
            devices: Vec::new(),
            processes: Vec::new(),
        };
        model.rebuild_devices(app, true);
        model.rebuild_processes(app, true);
        model
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Set the volume step, bounded to 1-20 percent points.
    pub fn set_step(&mut self, step: u8) {
        self.step = clamp_step(step);
    }

    pub fn devices(&self) -> &[Choice] {
        &self.devices
    }

    pub fn processes(&self) -> &[Choice] {
        &self.processes
    }

    /// Check or uncheck a device. Returns false if it is not listed.
    pub fn set_device_hidden(&mut self, device_id: &str, hidden: bool) -> bool {
        set_checked(&mut self.devices, device_id, hidden)
    }

    /// Check or uncheck a process. Returns false if it is not listed.
    pub fn set_process_hidden(&mut self, process_name: &str, hidden: bool) -> bool {
        set_checked(&mut self.processes, process_name, hidden)
    }

    /// Re-scan devices now and list them along with the hidden ones.
    pub fn update_devices(&mut self, app: &AppState) {
        if let Err(e) = app.registry().initialize() {
            warn!(error = %e, "Device update failed, keeping previous list");
        }
        self.rebuild_devices(app, true);
    }

    /// List only the devices currently present, none checked.
    pub fn clear_devices(&mut self, app: &AppState) {
        self.rebuild_devices(app, false);
    }

    /// Re-read live sessions and list them along with the hidden ones.
    pub fn update_processes(&mut self, app: &AppState) {
        self.rebuild_processes(app, true);
    }

    /// List only the live sessions, none checked.
    pub fn clear_processes(&mut self, app: &AppState) {
        self.rebuild_processes(app, false);
    }

    fn rebuild_devices(&mut self, app: &AppState, keep_hidden: bool) {
        let hidden = &app.preferences().devices;
        let mut choices: Vec<Choice> = Vec::new();
        if keep_hidden {
            choices.extend(hidden.iter().map(|(id, name)| Choice::new(id, name, true)));
        }
        for endpoint in app.registry().snapshot().iter() {
            if !choices.iter().any(|c| c.key == endpoint.id) {
                choices.push(Choice::new(&endpoint.id, &endpoint.name, false));
            }
        }
        self.devices = choices;
    }

    fn rebuild_processes(&mut self, app: &AppState, keep_hidden: bool) {
        let hidden = &app.preferences().processes;
        let mut choices: Vec<Choice> = app
            .resolver()
            .list_session_names()
            .into_iter()
            .map(|name| {
                let checked = keep_hidden && hidden.contains(&name);
                Choice::new(name.clone(), name, checked)
            })
            .collect();
        if keep_hidden {
            for name in hidden {
                if !choices.iter().any(|c| &c.key == name) {
                    choices.push(Choice::new(name, name, true));
                }
            }
        }
        self.processes = choices;
    }

    /// Preferences as currently edited.
    pub fn preferences(&self) -> UserPreferences {
        let devices: BTreeMap<String, String> = self
            .devices
            .iter()
            .filter(|c| c.checked)
            .map(|c| (c.key.clone(), c.label.clone()))
            .collect();
        let mut processes: Vec<String> = Vec::new();
        for choice in self.processes.iter().filter(|c| c.checked) {
            if !processes.contains(&choice.key) {
                processes.push(choice.key.clone());
            }
        }

        UserPreferences {
            step: self.step,
            devices,
            processes,
            ..Default::default()
        }
    }

    /// Persist the edited preferences and apply them to the application.
    ///
    /// Returns the registry refresh thread when the hidden devices changed.
    pub fn save(&self, app: &mut AppState) -> Result<Option<JoinHandle<()>>, PreferencesError> {
        let preferences = self.preferences();
        self.store.save(&preferences)?;
        Ok(app.apply_preferences(preferences))
    }
}

fn clamp_step(step: u8) -> u8 {
    step.clamp(1, MAX_STEP_PERCENT)
}

fn set_checked(choices: &mut [Choice], key: &str, checked: bool) -> bool {
    let mut found = false;
    for choice in choices.iter_mut().filter(|c| c.key == key) {
        choice.checked = checked;
        found = true;
    }
    found
}
