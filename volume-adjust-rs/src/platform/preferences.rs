//! User preferences persisted as JSON.
//!
//! Holds the volume step and the devices and processes hidden from
//! navigation.

use crate::audio::HiddenSet;
use crate::commands::DEFAULT_STEP_PERCENT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Current on-disk format version.
pub const PREFERENCES_VERSION: u32 = 1;

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub version: u32,

    /// Volume step in percent points (1-20)
    #[serde(default = "default_step")]
    pub step: u8,

    /// Hidden devices: device ID -> name shown in settings
    #[serde(default)]
    pub devices: BTreeMap<String, String>,

    /// Hidden process names
    #[serde(default)]
    pub processes: Vec<String>,
}

fn default_step() -> u8 {
    DEFAULT_STEP_PERCENT
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            step: DEFAULT_STEP_PERCENT,
            devices: BTreeMap::new(),
            processes: Vec::new(),
        }
    }
}

impl UserPreferences {
    pub fn hidden_set(&self) -> HiddenSet {
        HiddenSet::new(self.devices.keys().cloned(), self.processes.iter().cloned())
    }
}

/// Preferences service error types.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Failed to access preferences file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid preferences file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No configuration directory available")]
    NoConfigDir,
}

/// JSON-file preferences service.
#[derive(Debug, Clone)]
pub struct JsonPreferences {
    path: PathBuf,
}

impl JsonPreferences {
    const FILE_NAME: &'static str = "volume-adjust.json";
    const APP_DIR: &'static str = "volume-adjust";
    const PATH_ENV: &'static str = "VOLUME_ADJUST_CONFIG";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Preferences at `$VOLUME_ADJUST_CONFIG`, or in the platform config directory.
    pub fn from_env() -> Result<Self, PreferencesError> {
        if let Some(path) = std::env::var_os(Self::PATH_ENV) {
            return Ok(Self::new(path));
        }
        let dir = dirs::config_dir().ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::new(dir.join(Self::APP_DIR).join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences from storage.
    ///
    /// A missing or unreadable file yields defaults.
    pub fn load(&self) -> UserPreferences {
        match self.try_load() {
            Ok(prefs) => prefs,
            Err(PreferencesError::Io { source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!(path = %self.path.display(), "No preferences file, using defaults");
                UserPreferences::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load preferences, using defaults");
                UserPreferences::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<UserPreferences, PreferencesError> {
        let text = fs::read_to_string(&self.path).map_err(|source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut prefs: UserPreferences = serde_json::from_str(&text)?;
        prefs.version = PREFERENCES_VERSION;
        Ok(prefs)
    }

    /// Save preferences to storage.
    pub fn save(&self, preferences: &UserPreferences) -> Result<(), PreferencesError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| PreferencesError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let text = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, text).map_err(|source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = JsonPreferences::new(dir.path().join("absent.json"));

        assert_eq!(prefs.load(), UserPreferences::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferences::new(dir.path().join("nested").join("prefs.json"));
        let mut prefs = UserPreferences {
            step: 5,
            ..Default::default()
        };
        prefs
            .devices
            .insert("{0.0.0.00000000}.{abc}".to_string(), "Динамики".to_string());
        prefs.processes.push("app.exe".to_string());

        store.save(&prefs).unwrap();

        assert_eq!(store.try_load().unwrap(), prefs);
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("Динамики"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"processes": ["game.exe"]}"#).unwrap();

        let prefs = JsonPreferences::new(&path).load();

        assert_eq!(prefs.step, DEFAULT_STEP_PERCENT);
        assert_eq!(prefs.version, PREFERENCES_VERSION);
        assert!(prefs.hidden_set().process_names.contains("game.exe"));
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonPreferences::new(&path);

        assert!(matches!(store.try_load(), Err(PreferencesError::Json(_))));
        assert_eq!(store.load(), UserPreferences::default());
    }
}
