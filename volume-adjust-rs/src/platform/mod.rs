//! Platform services.
//!
//! Persistence of user preferences.

pub mod preferences;

pub use preferences::{JsonPreferences, PreferencesError, UserPreferences};
