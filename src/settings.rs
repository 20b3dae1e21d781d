//! Player settings and preferences
//!
//! Persisted separately from level progress.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_IMPACT_RADIUS, IMPACT_RADIUS_PER_SENSITIVITY};
use crate::storage;

pub const MIN_SENSITIVITY: u8 = 1;
pub const MAX_SENSITIVITY: u8 = 10;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Controls ===
    /// Water cannon sensitivity (1 - 10); wider spray when higher
    pub sensitivity: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 0.8,
            music_volume: 0.5,
            sensitivity: 5,
        }
    }
}

impl Settings {
    /// Settings with every field forced into its valid range
    pub fn sanitized(mut self) -> Self {
        self.sfx_volume = clamp_volume(self.sfx_volume);
        self.music_volume = clamp_volume(self.music_volume);
        self.sensitivity = self.sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
        self
    }

    pub fn set_sensitivity(&mut self, sensitivity: u8) {
        self.sensitivity = sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
    }

    /// Water impact radius (pixels)
    pub fn impact_radius(&self) -> f32 {
        BASE_IMPACT_RADIUS + f32::from(self.sensitivity) * IMPACT_RADIUS_PER_SENSITIVITY
    }

    /// Storage key / file name
    const STORAGE_KEY: &'static str = "graffiti_wash_settings";

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(&storage::default_location(Self::STORAGE_KEY))
    }

    pub fn load_from(location: &Path) -> Self {
        match storage::read_json::<Settings>(location) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        self.save_to(&storage::default_location(Self::STORAGE_KEY));
    }

    pub fn save_to(&self, location: &Path) {
        match storage::write_json(location, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

fn clamp_volume(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}
