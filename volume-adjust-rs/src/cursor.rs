//! Selection of the current audio source.
//!
//! Sources are the registry's devices followed by the live, visible
//! sessions. The session tail is re-queried on every navigation, so the
//! index may point past the end after a process exits; the next
//! navigation wraps it back into range.

use crate::audio::{DeviceRegistry, NullControl, SessionResolver, VolumeControl};
use crate::commands::Messages;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the cursor currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Device(usize),
    Session(String),
}

pub struct SourceCursor {
    registry: Arc<DeviceRegistry>,
    resolver: SessionResolver,
    index: usize,
    selected_process: String,
}

impl SourceCursor {
    pub fn new(registry: Arc<DeviceRegistry>, resolver: SessionResolver) -> Self {
        Self {
            registry,
            resolver,
            index: 0,
            selected_process: String::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the next source, wrapping to the first. Returns the label
    /// of the new selection, or `None` when there are no sources.
    pub fn next(&mut self, messages: &Messages) -> Option<String> {
        self.step(messages, |index, total| (index + 1) % total)
    }

    /// Move to the previous source, wrapping to the last.
    pub fn previous(&mut self, messages: &Messages) -> Option<String> {
        self.step(messages, |index, total| (index % total + total - 1) % total)
    }

    fn step(
        &mut self,
        messages: &Messages,
        advance: impl Fn(usize, usize) -> usize,
    ) -> Option<String> {
        let device_count = self.registry.count();
        let sessions = self.resolver.list_visible_session_names();
        let total = device_count + sessions.len();
        if total == 0 {
            self.index = 0;
            self.selected_process.clear();
            return None;
        }
        self.index = advance(self.index, total);
        debug!(index = self.index, total, "Selected audio source");
        self.select(device_count, &sessions);
        Some(self.label(device_count, messages))
    }

    /// Remember the process behind the current index, if it is a session.
    fn select(&mut self, device_count: usize, sessions: &[String]) {
        if self.index < device_count {
            return;
        }
        match sessions.get(self.index - device_count) {
            Some(name) => self.selected_process = name.clone(),
            None => debug!(index = self.index, "Session list shrank, keeping previous process"),
        }
    }

    pub fn selection(&self) -> Selection {
        if self.index < self.registry.count() {
            Selection::Device(self.index)
        } else {
            Selection::Session(self.selected_process.clone())
        }
    }

    /// True when there are neither devices nor visible sessions.
    fn has_no_sources(&self, device_count: usize) -> bool {
        device_count == 0 && self.resolver.list_visible_session_names().is_empty()
    }

    /// Display name of the current source, empty when there are no sources.
    pub fn current_label(&self, messages: &Messages) -> String {
        let device_count = self.registry.count();
        if self.has_no_sources(device_count) {
            return String::new();
        }
        self.label(device_count, messages)
    }

    fn label(&self, device_count: usize, messages: &Messages) -> String {
        if self.index < device_count {
            match self.registry.at(self.index) {
                Ok(endpoint) if endpoint.is_default => messages.default_device(&endpoint.name),
                Ok(endpoint) => endpoint.name,
                Err(e) => {
                    warn!(error = %e, "Selected device disappeared");
                    String::new()
                }
            }
        } else {
            self.resolver.title(&self.selected_process)
        }
    }

    /// Volume control for the current source.
    ///
    /// Never fails: a vanished device or session yields [`NullControl`], as
    /// does an empty source list.
    pub fn current_control(&self) -> Arc<dyn VolumeControl> {
        if self.has_no_sources(self.registry.count()) {
            debug!("No audio sources, using null control");
            return Arc::new(NullControl);
        }
        match self.selection() {
            Selection::Device(index) => match self.registry.at(index) {
                Ok(endpoint) => endpoint.control,
                Err(e) => {
                    warn!(error = %e, "Selected device disappeared, using null control");
                    Arc::new(NullControl)
                }
            },
            Selection::Session(process_name) => self.resolver.resolve(&process_name),
        }
    }
}
