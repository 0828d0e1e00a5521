//! Player preferences
//!
//! Persisted separately from the game in LocalStorage. Only audio options;
//! a run itself is never saved.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,
    /// Play the walking cue
    pub footsteps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            footsteps: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "midnight_heist_settings";

    /// Parse stored JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply an in-game hotkey: `M` flips mute, `F` flips the walking cue.
    ///
    /// Returns true when a preference changed and should be saved.
    pub fn toggle_for_key(&mut self, identity: &str) -> bool {
        if identity.eq_ignore_ascii_case("m") {
            self.muted = !self.muted;
            log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
            true
        } else if identity.eq_ignore_ascii_case("f") {
            self.footsteps = !self.footsteps;
            log::info!("Footsteps {}", if self.footsteps { "on" } else { "off" });
            true
        } else {
            false
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_json(r#"{ "muted": true }"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 0.8);
        assert!(settings.footsteps);
    }

    #[test]
    fn test_settings_json_round_trip() {
        let settings = Settings {
            sfx_volume: 0.5,
            footsteps: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_hotkeys_toggle_and_persist() {
        let mut settings = Settings::default();

        assert!(settings.toggle_for_key("M"));
        assert!(settings.muted);
        assert!(settings.toggle_for_key("f"));
        assert!(!settings.footsteps);

        // Movement and unknown keys leave preferences alone
        assert!(!settings.toggle_for_key("w"));
        assert!(!settings.toggle_for_key("ArrowUp"));
        assert!(!settings.toggle_for_key("Meta"));

        // What gets saved is what loads next time
        let json = serde_json::to_string(&settings).unwrap();
        let reloaded = Settings::from_json(&json).unwrap();
        assert!(reloaded.muted);
        assert!(!reloaded.footsteps);

        assert!(settings.toggle_for_key("m"));
        assert!(!settings.muted);
    }
}
