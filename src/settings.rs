//! Runtime settings for the game drivers
//!
//! Rule constants are compiled in (see `consts`); these only shape how the
//! simulation is driven. Persisted in LocalStorage on the web, read from a
//! JSON file natively.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cadence of the power-up cleanup task
    pub cleanup_interval_ms: u64,
    /// Most tasks one pump may run; any further backlog is dropped
    pub max_tasks_per_pump: u32,
    /// Let the autopilot steer the paddle
    pub autopilot: bool,
    /// Fixed spawn seed (random when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cleanup_interval_ms: 1000,
            max_tasks_per_pump: 8,
            autopilot: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Clamp values that would stall the scheduler
    pub fn sanitized(mut self) -> Self {
        self.cleanup_interval_ms = self.cleanup_interval_ms.max(1);
        self.max_tasks_per_pump = self.max_tasks_per_pump.max(1);
        self
    }

    /// Configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "star_catcher_settings";

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

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match self.to_json() {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(_) => log::warn!("LocalStorage rejected settings"),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
