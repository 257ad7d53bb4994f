//! Game settings and preferences
//!
//! Persisted as JSON in the key-value store, separate from the backend tables.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{KvStore, StorageError, read_json, write_json};

/// When to show the on-screen joystick and fire button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TouchControls {
    /// Decide from viewport width
    #[default]
    Auto,
    Always,
    Never,
}

impl TouchControls {
    pub fn as_str(&self) -> &'static str {
        match self {
            TouchControls::Auto => "Auto",
            TouchControls::Always => "Always",
            TouchControls::Never => "Never",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(TouchControls::Auto),
            "always" | "on" => Some(TouchControls::Always),
            "never" | "off" => Some(TouchControls::Never),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Pause and silence when the window loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Render objects without spin
    pub reduced_motion: bool,

    // === Controls ===
    pub touch_controls: TouchControls,

    /// Last username entered on the menu
    pub username: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            show_fps: false,

            reduced_motion: false,

            touch_controls: TouchControls::Auto,

            username: None,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "astro_blaster_settings";

    /// Volume applied to sound effects, 0 when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Remember the menu username; blank input clears it
    pub fn set_username(&mut self, name: &str) {
        let name = name.trim();
        self.username = (!name.is_empty()).then(|| name.to_string());
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load(store: &impl KvStore) -> Self {
        match read_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and returned
    pub fn save(&self, store: &mut impl KvStore) -> Result<(), StorageError> {
        write_json(store, Self::STORAGE_KEY, self)
            .inspect(|_| log::info!("Settings saved"))
            .inspect_err(|e| log::warn!("Settings not saved: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_load_defaults_when_missing_or_corrupt() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        store.set(Settings::STORAGE_KEY, "][").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.muted = true;
        settings.touch_controls = TouchControls::Never;
        settings.set_username("  ace  ");
        settings.save(&mut store).unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded.username.as_deref(), Some("ace"));
        assert_eq!(loaded.touch_controls, TouchControls::Never);
        assert_eq!(loaded.effective_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"show_fps":true}"#)
            .unwrap();
        let loaded = Settings::load(&store);
        assert!(loaded.show_fps);
        assert_eq!(loaded.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_touch_controls_from_str() {
        assert_eq!(TouchControls::from_str("ON"), Some(TouchControls::Always));
        assert_eq!(TouchControls::from_str("auto"), Some(TouchControls::Auto));
        assert_eq!(TouchControls::from_str("sometimes"), None);
    }
}
