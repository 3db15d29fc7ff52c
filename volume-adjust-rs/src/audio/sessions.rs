//! Resolution of process names to live audio sessions.
//!
//! Nothing is cached: each call re-queries the session list, so a
//! process that exited between two key presses simply stops matching.

use super::control::{NullControl, VolumeControl};
use super::hidden::HiddenSetFilter;
use super::system::{AudioSystem, SessionDescriptor};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct SessionResolver {
    system: Arc<dyn AudioSystem>,
    hidden: HiddenSetFilter,
}

impl SessionResolver {
    pub fn new(system: Arc<dyn AudioSystem>, hidden: HiddenSetFilter) -> Self {
        Self { system, hidden }
    }

    fn live_sessions(&self) -> Vec<SessionDescriptor> {
        self.system.sessions().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to enumerate audio sessions");
            Vec::new()
        })
    }

    fn find(&self, process_name: &str) -> Option<SessionDescriptor> {
        if process_name.is_empty() {
            return None;
        }
        // Only the first matching session is controlled, even when a
        // process owns several.
        self.live_sessions()
            .into_iter()
            .find(|s| s.process_name == process_name)
    }

    /// Control for the first live session owned by `process_name`.
    ///
    /// Returns [`NullControl`] when no session matches.
    pub fn resolve(&self, process_name: &str) -> Arc<dyn VolumeControl> {
        match self.find(process_name) {
            Some(session) => session.control,
            None => {
                debug!(process_name, "No live audio session, using null control");
                Arc::new(NullControl)
            }
        }
    }

    /// Human-friendly title for a process's session.
    pub fn title(&self, process_name: &str) -> String {
        let display_name = self
            .find(process_name)
            .and_then(|s| s.display_name)
            .filter(|name| !name.is_empty() && !name.starts_with("@%"));

        match display_name {
            Some(name) => name,
            None => process_name
                .strip_suffix(".exe")
                .unwrap_or(process_name)
                .to_string(),
        }
    }

    /// Process names of live sessions not hidden by the user.
    ///
    /// Not deduplicated: a process with several sessions appears once per
    /// session, which navigation indexes rely on. The whole list is
    /// filtered against one copy of the hidden set.
    pub fn list_visible_session_names(&self) -> Vec<String> {
        let hidden = self.hidden.snapshot();
        self.live_sessions()
            .into_iter()
            .map(|s| s.process_name)
            .filter(|name| !hidden.process_names.contains(name))
            .collect()
    }

    /// Process names of all live sessions, hidden ones included.
    pub fn list_session_names(&self) -> Vec<String> {
        self.live_sessions()
            .into_iter()
            .map(|s| s.process_name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::control::ControlKind;
    use crate::audio::fake::FakeAudioSystem;
    use crate::audio::device::AudioError;
    use crate::audio::hidden::HiddenSet;
    use crate::audio::system::EndpointDescriptor;

    fn resolver(system: &Arc<FakeAudioSystem>, hidden: &[&str]) -> SessionResolver {
        let hidden = HiddenSet::new(Vec::<String>::new(), hidden.iter().map(|s| s.to_string()));
        SessionResolver::new(system.clone(), HiddenSetFilter::new(hidden))
    }

    /// Hides a process from inside the session query, standing in for a
    /// settings save landing mid-navigation.
    struct HideDuringQuery {
        inner: Arc<FakeAudioSystem>,
        filter: HiddenSetFilter,
        process_name: String,
    }

    impl AudioSystem for HideDuringQuery {
        fn active_endpoints(&self) -> Result<Vec<EndpointDescriptor>, AudioError> {
            self.inner.active_endpoints()
        }

        fn default_endpoint(&self) -> Result<Option<EndpointDescriptor>, AudioError> {
            self.inner.default_endpoint()
        }

        fn sessions(&self) -> Result<Vec<SessionDescriptor>, AudioError> {
            self.filter.replace(HiddenSet::new(
                Vec::<String>::new(),
                vec![self.process_name.clone()],
            ));
            self.inner.sessions()
        }
    }

    #[test]
    fn test_resolve_returns_first_matching_session() {
        let system = FakeAudioSystem::new();
        let first = system.add_session("browser.exe", None);
        let second = system.add_session("browser.exe", None);
        let resolver = resolver(&system, &[]);

        let control = resolver.resolve("browser.exe");
        control.set_volume(0.25).unwrap();

        assert_eq!(control.kind(), ControlKind::Session);
        assert_eq!(first.volume(), 0.25);
        assert_eq!(second.volume(), 0.5);
    }

    #[test]
    fn test_resolve_is_case_sensitive_and_falls_back_to_null() {
        let system = FakeAudioSystem::new();
        system.add_session("app.exe", None);
        let resolver = resolver(&system, &[]);

        assert_eq!(resolver.resolve("App.exe").kind(), ControlKind::Null);
        assert_eq!(resolver.resolve("").kind(), ControlKind::Null);
    }

    #[test]
    fn test_resolve_after_process_exit_yields_null() {
        let system = FakeAudioSystem::new();
        system.add_session("app.exe", None);
        let resolver = resolver(&system, &[]);
        assert_eq!(resolver.resolve("app.exe").kind(), ControlKind::Session);

        system.clear_sessions();

        assert_eq!(resolver.resolve("app.exe").kind(), ControlKind::Null);
    }

    #[test]
    fn test_hidden_sessions_are_not_listed() {
        let system = FakeAudioSystem::new();
        system.add_session("app.exe", None);
        let resolver = resolver(&system, &["app.exe"]);

        assert!(resolver.list_visible_session_names().is_empty());
        assert_eq!(resolver.list_session_names(), vec!["app.exe"]);
    }

    #[test]
    fn test_visible_names_keep_duplicates_in_order() {
        let system = FakeAudioSystem::new();
        system.add_session("b.exe", None);
        system.add_session("a.exe", None);
        system.add_session("b.exe", None);
        let resolver = resolver(&system, &[]);

        assert_eq!(
            resolver.list_visible_session_names(),
            vec!["b.exe", "a.exe", "b.exe"]
        );
    }

    #[test]
    fn test_title_prefers_display_name() {
        let system = FakeAudioSystem::new();
        system.add_session("player.exe", Some("Music Player"));
        system.add_session("chat.exe", Some("@%SystemRoot%\\System32\\chat.dll,-101"));
        system.add_session("game.exe", Some(""));
        let resolver = resolver(&system, &[]);

        assert_eq!(resolver.title("player.exe"), "Music Player");
        assert_eq!(resolver.title("chat.exe"), "chat");
        assert_eq!(resolver.title("game.exe"), "game");
        assert_eq!(resolver.title("gone.exe"), "gone");
    }

    #[test]
    fn test_visible_names_use_one_hidden_set_per_listing() {
        let inner = FakeAudioSystem::new();
        inner.add_session("a.exe", None);
        inner.add_session("b.exe", None);
        let filter = HiddenSetFilter::default();
        let system = Arc::new(HideDuringQuery {
            inner,
            filter: filter.clone(),
            process_name: "a.exe".to_string(),
        });
        let resolver = SessionResolver::new(system, filter);

        assert_eq!(resolver.list_visible_session_names(), vec!["a.exe", "b.exe"]);
        assert_eq!(resolver.list_visible_session_names(), vec!["b.exe"]);
    }

    #[test]
    fn test_enumeration_failure_lists_nothing() {
        let system = FakeAudioSystem::new();
        system.add_session("app.exe", None);
        system.set_fail_enumeration(true);
        let resolver = resolver(&system, &[]);

        assert!(resolver.list_visible_session_names().is_empty());
        assert_eq!(resolver.resolve("app.exe").kind(), ControlKind::Null);
    }
}
