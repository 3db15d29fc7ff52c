//! Application state and lifecycle management.
//!
//! Ties the device registry, session resolver, cursor and command handler
//! together behind a single foreground dispatch entry point.

use crate::audio::{AudioSystem, DeviceRegistry, HiddenSetFilter, SessionResolver};
use crate::commands::{Announcer, Command, Messages, VolumeCommandHandler, VolumeOutcome};
use crate::cursor::SourceCursor;
use crate::platform::UserPreferences;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Main application state.
pub struct AppState {
    registry: Arc<DeviceRegistry>,
    resolver: SessionResolver,
    hidden: HiddenSetFilter,
    cursor: SourceCursor,
    handler: VolumeCommandHandler,
    announcer: Arc<dyn Announcer>,
    preferences: UserPreferences,
}

impl AppState {
    /// Create the application state. The registry starts empty; call
    /// [`refresh_in_background`](Self::refresh_in_background) to populate it.
    pub fn new(
        system: Arc<dyn AudioSystem>,
        preferences: UserPreferences,
        messages: Messages,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        let hidden = HiddenSetFilter::new(preferences.hidden_set());
        let registry = Arc::new(DeviceRegistry::new(Arc::clone(&system), hidden.clone()));
        let resolver = SessionResolver::new(system, hidden.clone());
        let cursor = SourceCursor::new(Arc::clone(&registry), resolver.clone());
        let handler = VolumeCommandHandler::new(preferences.step, messages);

        Self {
            registry,
            resolver,
            hidden,
            cursor,
            handler,
            announcer,
            preferences,
        }
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    pub fn cursor(&self) -> &SourceCursor {
        &self.cursor
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Handle one hotkey command.
    pub fn dispatch(&mut self, command: Command) -> Option<VolumeOutcome> {
        debug!(?command, "Dispatching command");
        match command {
            Command::NextSource => {
                if let Some(label) = self.cursor.next(self.handler.messages()) {
                    self.announcer.announce(&label);
                }
                None
            }
            Command::PreviousSource => {
                if let Some(label) = self.cursor.previous(self.handler.messages()) {
                    self.announcer.announce(&label);
                }
                None
            }
            _ => {
                let control = self.cursor.current_control();
                self.handler
                    .execute(command, &*control, self.announcer.as_ref())
            }
        }
    }

    /// Rebuild the device registry on a background thread.
    ///
    /// Overlapping refreshes are allowed; the last one to finish wins.
    /// If no thread can be spawned the refresh runs inline and `None` is
    /// returned.
    pub fn refresh_in_background(&self) -> Option<JoinHandle<()>> {
        let registry = Arc::clone(&self.registry);
        let spawned = thread::Builder::new()
            .name("device-registry-refresh".to_string())
            .spawn(move || refresh(&registry));

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Could not spawn refresh thread, refreshing inline");
                refresh(&self.registry);
                None
            }
        }
    }

    /// Apply new preferences. Returns the refresh thread when the hidden
    /// device set changed.
    pub fn apply_preferences(&mut self, preferences: UserPreferences) -> Option<JoinHandle<()>> {
        self.handler.set_step_percent(preferences.step);
        let new_hidden = preferences.hidden_set();
        let previous = self.hidden.replace(new_hidden.clone());
        self.preferences = preferences;

        if previous.processes_differ(&new_hidden) {
            debug!(
                hidden = new_hidden.process_names.len(),
                "Hidden processes changed, applies from the next navigation"
            );
        }
        if previous.devices_differ(&new_hidden) {
            info!("Hidden devices changed, refreshing device registry");
            self.refresh_in_background()
        } else {
            None
        }
    }
}

fn refresh(registry: &DeviceRegistry) {
    if let Err(e) = registry.initialize() {
        warn!(error = %e, "Device refresh failed, keeping previous devices");
    }
}
