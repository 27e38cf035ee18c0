//! Window and loop settings
//!
//! Optional `tiny_asteroids.json` in the working directory. Missing fields
//! take their defaults, which match the classic build exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            title: WINDOW_TITLE.to_string(),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,

    // === Loop ===
    /// Cap on fixed steps per frame; `None` lets a stall replay every step
    pub max_steps_per_frame: Option<u32>,
    /// Present with vsync
    pub vsync: bool,
    /// Rock spawn seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show the ship position readout
    pub show_position: bool,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            max_steps_per_frame: Some(MAX_SUBSTEPS),
            vsync: true,
            seed: None,
            show_fps: true,
            show_position: true,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Settings file looked up by [`Settings::load`]
    pub const FILE_NAME: &'static str = "tiny_asteroids.json";

    /// Parse settings; out-of-range tuning is repaired with a warning
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.tuning = settings.tuning.sanitized();
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load settings from the working directory, falling back to defaults
    pub fn load() -> Self {
        let path = Path::new(Self::FILE_NAME);
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_build() {
        let settings = Settings::default();
        assert_eq!(settings.window.width, 1280);
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.window.title, "Game");
        assert_eq!(settings.max_steps_per_frame, Some(MAX_SUBSTEPS));
    }

    #[test]
    fn test_from_json_partial() {
        let settings =
            Settings::from_json(r#"{ "show_fps": false, "max_steps_per_frame": null }"#).unwrap();
        assert!(!settings.show_fps);
        assert_eq!(settings.max_steps_per_frame, None);
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(Error::SettingsParse(_))
        ));
    }

    #[test]
    fn test_from_json_clamps_huge_rock_cap() {
        let settings =
            Settings::from_json(r#"{ "tuning": { "rock_cap": 18446744073709551615 } }"#).unwrap();
        assert_eq!(settings.tuning.rock_cap, crate::tuning::MAX_ROCK_CAP);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Settings::load_from(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::SettingsIo { .. }));
    }
}
