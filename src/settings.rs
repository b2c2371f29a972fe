//! Player preferences
//!
//! Persisted separately from progress in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};

/// Animation speed-up applied with reduced motion
const REDUCED_MOTION_SCALE: f64 = 0.35;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shorter cube animations (and shorter column locks)
    pub reduced_motion: bool,
    /// Show the level hint line under the title
    pub show_hints: bool,
    /// High contrast HUD colours
    pub high_contrast: bool,
    /// Ask before a debug level jump throws away the current board
    pub confirm_level_jump: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            show_hints: true,
            high_contrast: false,
            confirm_level_jump: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flag_tower_settings";

    /// Column lock duration after scaling for reduced motion
    pub fn effective_animation_ms(&self, base_ms: f64) -> f64 {
        if self.reduced_motion {
            base_ms * REDUCED_MOTION_SCALE
        } else {
            base_ms
        }
    }

    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<Settings>(storage, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        if save_json(storage, Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_reduced_motion_shortens_lock() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_animation_ms(400.0), 400.0);
        settings.reduced_motion = true;
        assert!((settings.effective_animation_ms(400.0) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set_item("flag_tower_settings", r#"{"high_contrast": true}"#);
        let settings = Settings::load(&storage);
        assert!(settings.high_contrast);
        assert!(settings.show_hints);
    }

    #[test]
    fn test_save_load() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }
}
