//! Volume commands and spoken feedback.

use crate::audio::{AudioError, ControlKind, VolumeControl};
use std::str::FromStr;
use tracing::{debug, warn};

/// Largest step, in percent points, the user can configure.
pub const MAX_STEP_PERCENT: u8 = 20;

/// Step used when preferences do not set one.
pub const DEFAULT_STEP_PERCENT: u8 = 2;

/// The six logical commands bound to hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    VolumeUp,
    VolumeDown,
    VolumeMax,
    VolumeMin,
    NextSource,
    PreviousSource,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Command::VolumeUp),
            "down" => Ok(Command::VolumeDown),
            "max" => Ok(Command::VolumeMax),
            "min" => Ok(Command::VolumeMin),
            "next" => Ok(Command::NextSource),
            "prev" | "previous" => Ok(Command::PreviousSource),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Sink for text announcements (speech or braille output).
pub trait Announcer: Send + Sync {
    fn announce(&self, text: &str);
}

/// Localisable announcement strings.
#[derive(Debug, Clone)]
pub struct Messages {
    /// Prefix for level announcements
    pub volume: String,

    /// Announced when a source is muted by stepping down
    pub muted: String,

    /// Marker for the system default device
    pub default_prefix: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            volume: "Volume".to_string(),
            muted: "The sound is muted".to_string(),
            default_prefix: "default".to_string(),
        }
    }
}

impl Messages {
    pub fn volume_level(&self, level: f32) -> String {
        format!("{} {}", self.volume, percent(level))
    }

    pub fn default_device(&self, name: &str) -> String {
        format!("{}: {}", self.default_prefix, name)
    }
}

/// Volume as percentage (0-100), truncated.
pub fn percent(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 100.0) as u8
}

/// Result of a volume command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeOutcome {
    Level(f32),
    Muted,
}

/// Applies volume commands to whatever control is currently selected.
pub struct VolumeCommandHandler {
    step: f32,
    messages: Messages,
}

impl VolumeCommandHandler {
    pub fn new(step_percent: u8, messages: Messages) -> Self {
        let mut handler = Self {
            step: 0.0,
            messages,
        };
        handler.set_step_percent(step_percent);
        handler
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Set the step in percent points, clamped to 1..=20.
    pub fn set_step_percent(&mut self, step_percent: u8) {
        let clamped = step_percent.clamp(1, MAX_STEP_PERCENT);
        if clamped != step_percent {
            warn!(step_percent, clamped, "Volume step out of range, clamping");
        }
        self.step = f32::from(clamped) / 100.0;
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Raise the level by one step, unmuting first if the source is
    /// muted at or below one step.
    pub fn increase(&self, control: &dyn VolumeControl) -> Result<f32, AudioError> {
        let level = control.get_volume()?;
        if level <= self.step && control.get_mute()? {
            control.set_mute(false)?;
        }
        let level = (level + self.step).min(1.0);
        control.set_volume(level)?;
        Ok(level)
    }

    /// Lower the level by one step; reaching zero mutes instead.
    pub fn decrease(&self, control: &dyn VolumeControl) -> Result<VolumeOutcome, AudioError> {
        let level = (control.get_volume()? - self.step).max(0.0);
        if level > 0.0 {
            control.set_volume(level)?;
            Ok(VolumeOutcome::Level(level))
        } else {
            control.set_mute(true)?;
            Ok(VolumeOutcome::Muted)
        }
    }

    /// Unmute and set full volume.
    pub fn set_max(&self, control: &dyn VolumeControl) -> Result<f32, AudioError> {
        if control.get_mute()? {
            control.set_mute(false)?;
        }
        control.set_volume(1.0)?;
        control.get_volume()
    }

    /// Set zero volume. The mute state is left as it is.
    pub fn set_min(&self, control: &dyn VolumeControl) -> Result<f32, AudioError> {
        control.set_volume(0.0)?;
        control.get_volume()
    }

    /// Run a volume command and announce the result.
    ///
    /// Navigation commands are not handled here and return `None`.
    pub fn execute(
        &self,
        command: Command,
        control: &dyn VolumeControl,
        announcer: &dyn Announcer,
    ) -> Option<VolumeOutcome> {
        let result = match command {
            Command::VolumeUp => self.increase(control).map(VolumeOutcome::Level),
            Command::VolumeDown => self.decrease(control),
            Command::VolumeMax => self.set_max(control).map(VolumeOutcome::Level),
            Command::VolumeMin => self.set_min(control).map(VolumeOutcome::Level),
            Command::NextSource | Command::PreviousSource => return None,
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if e.is_unavailable() => {
                debug!(?command, "Audio source went away, ignoring command");
                return None;
            }
            Err(e) => {
                warn!(?command, error = %e, "Volume command failed");
                return None;
            }
        };

        if control.kind() == ControlKind::Null {
            debug!(?command, "No live source selected, nothing to announce");
            return Some(outcome);
        }

        match outcome {
            VolumeOutcome::Level(level) => announcer.announce(&self.messages.volume_level(level)),
            VolumeOutcome::Muted => announcer.announce(&self.messages.muted),
        }
        Some(outcome)
    }
}
