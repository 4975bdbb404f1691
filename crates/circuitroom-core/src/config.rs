//! TOML-based engine configuration.
//!
//! Holds the tunables a host is allowed to change: Tabata interval shape
//! and notification/haptic preferences. Every field has a serde default so
//! a partial (or missing) file still yields a usable config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::circuit::{
    BlockFormat, DEFAULT_TABATA_INTERVALS, DEFAULT_TABATA_REST_SECS, DEFAULT_TABATA_WORK_SECS,
};
use crate::error::ConfigError;
use crate::events::Effect;

/// Tabata cycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabataConfig {
    #[serde(default = "default_tabata_work")]
    pub work_secs: u32,
    #[serde(default = "default_tabata_rest")]
    pub rest_secs: u32,
    #[serde(default = "default_tabata_intervals")]
    pub intervals: u32,
}

impl Default for TabataConfig {
    fn default() -> Self {
        Self {
            work_secs: default_tabata_work(),
            rest_secs: default_tabata_rest(),
            intervals: default_tabata_intervals(),
        }
    }
}

/// Notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub haptics: bool,
    #[serde(default = "default_sound")]
    pub sound: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            haptics: default_true(),
            sound: default_sound(),
        }
    }
}

impl NotificationsConfig {
    /// Apply user preferences to a requested effect before delivery:
    /// drop notifications when disabled, drop haptics when disabled, and
    /// substitute the configured sound. Wake-lock requests always pass
    /// through.
    pub fn apply(&self, effect: Effect) -> Option<Effect> {
        match effect {
            Effect::Notify { title, body, .. } => self.enabled.then(|| Effect::Notify {
                title,
                body,
                sound: self.sound.clone(),
            }),
            Effect::Haptic { .. } if !self.haptics => None,
            other => Some(other),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default)]
    pub tabata: TabataConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl TimerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Missing file falls back to defaults; a malformed file is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build the Tabata block format from configured values, rejecting a
    /// cycle that cannot progress.
    pub fn tabata_format(&self) -> Result<BlockFormat, ConfigError> {
        if self.tabata.work_secs == 0 || self.tabata.intervals == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tabata".into(),
                message: "work_secs and intervals must be > 0".into(),
            });
        }
        Ok(BlockFormat::Tabata {
            work_secs: self.tabata.work_secs,
            rest_secs: self.tabata.rest_secs,
            intervals: self.tabata.intervals,
        })
    }
}

fn default_tabata_work() -> u32 {
    DEFAULT_TABATA_WORK_SECS
}

fn default_tabata_rest() -> u32 {
    DEFAULT_TABATA_REST_SECS
}

fn default_tabata_intervals() -> u32 {
    DEFAULT_TABATA_INTERVALS
}

fn default_true() -> bool {
    true
}

fn default_sound() -> String {
    "chime".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_tabata() {
        let config = TimerConfig::default();
        assert_eq!(config.tabata.work_secs, 20);
        assert_eq!(config.tabata.rest_secs, 10);
        assert_eq!(config.tabata.intervals, 8);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: TimerConfig = toml::from_str("[tabata]\nwork_secs = 40\n").unwrap();
        assert_eq!(config.tabata.work_secs, 40);
        assert_eq!(config.tabata.rest_secs, 10);
        assert_eq!(config.notifications.sound, "chime");
    }

    #[test]
    fn zero_work_rejected_as_format() {
        let mut config = TimerConfig::default();
        config.tabata.work_secs = 0;
        assert!(config.tabata_format().is_err());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = TimerConfig::default();
        config.tabata.intervals = 10;
        config.save(&path).unwrap();
        let loaded = TimerConfig::load_or_default(&path).unwrap();
        assert_eq!(loaded.tabata.intervals, 10);
    }

    #[test]
    fn disabled_notifications_are_dropped() {
        let config = NotificationsConfig {
            enabled: false,
            haptics: true,
            sound: "chime".into(),
        };
        let effect = Effect::Notify {
            title: "Rest Complete!".into(),
            body: "".into(),
            sound: "chime".into(),
        };
        assert_eq!(config.apply(effect), None);
    }

    #[test]
    fn disabled_haptics_are_dropped_but_wake_lock_passes() {
        let config = NotificationsConfig {
            enabled: true,
            haptics: false,
            sound: "chime".into(),
        };
        let haptic = Effect::Haptic {
            intensity: crate::events::HapticIntensity::Heavy,
        };
        assert_eq!(config.apply(haptic), None);
        assert_eq!(
            config.apply(Effect::AcquireWakeLock),
            Some(Effect::AcquireWakeLock)
        );
    }

    #[test]
    fn configured_sound_replaces_requested_sound() {
        let config = NotificationsConfig {
            sound: "bell".into(),
            ..Default::default()
        };
        let effect = Effect::Notify {
            title: "New Minute".into(),
            body: "Minute 2 -- go!".into(),
            sound: "chime".into(),
        };
        match config.apply(effect) {
            Some(Effect::Notify { sound, .. }) => assert_eq!(sound, "bell"),
            other => panic!("expected Notify, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = TimerConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.tabata.work_secs, 20);
    }
}
