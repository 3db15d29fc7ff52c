//! Volume Adjustment - Library
//!
//! Hotkey-driven volume control for audio devices and per-application
//! audio sessions, with spoken feedback.
//!
//! ## Features
//!
//! - Cycle through output devices and running applications' audio sessions
//! - Raise, lower, maximise and minimise the selected source's volume
//! - Mute on stepping down to zero, unmute on stepping up from near zero
//! - Hide devices and processes from navigation
//! - Background device scan so startup never blocks

pub mod app;
pub mod audio;
pub mod commands;
pub mod cursor;
pub mod platform;
pub mod settings;

pub use app::AppState;
pub use audio::{AudioError, AudioSystem, DeviceRegistry, SessionResolver, VolumeControl};
pub use commands::{Announcer, Command, Messages, VolumeCommandHandler, VolumeOutcome};
pub use cursor::SourceCursor;
pub use platform::{JsonPreferences, PreferencesError, UserPreferences};
pub use settings::SettingsModel;
