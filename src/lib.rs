//! Graffiti Wash - an arcade multiplication game
//!
//! The player sprays water at three graffiti answers painted on a wall,
//! washing away the two wrong answers while keeping the correct one.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (facts, layout, erosion, rounds, sessions)
//! - `progress`: Level results, stars and unlocks behind a store trait
//! - `settings`: Player preferences (volumes, water sensitivity)
//! - `storage`: JSON persistence (config dir natively, LocalStorage on web)
//! - `web`: Browser bindings (wasm32 only)

pub mod progress;
pub mod settings;
pub mod sim;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use progress::{LevelRecord, MemoryProgress, PersistentProgress, ProgressData, ProgressStore, star_rating};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Answer tile bitmap size (pixels)
    pub const TILE_WIDTH: usize = 200;
    pub const TILE_HEIGHT: usize = 130;

    /// Glyph opacity above which a cell counts as ink (not glow)
    pub const INK_ALPHA_THRESHOLD: u8 = 80;
    /// Wear level of untouched paint
    pub const WEAR_INTACT: u8 = 255;
    /// Ink cells below this wear count as erased
    pub const ERASED_WEAR: u8 = 60;
    /// Wear below this snaps straight to zero (no faint ghosts)
    pub const SNAP_WEAR: u8 = 30;
    /// Fraction of erased ink that washes a tile
    pub const WASH_THRESHOLD: f32 = 0.85;
    /// Progress bar appears once this much ink is gone
    pub const PROGRESS_BAR_MIN: f32 = 0.02;

    /// Erosion at the impact center
    pub const IMPACT_STRENGTH: f64 = 150.0;
    /// Erosion loss at the impact rim (fraction of strength)
    pub const IMPACT_FALLOFF: f64 = 0.6;
    /// Extra hit-box margin around a tile (pixels)
    pub const HIT_TOLERANCE: f32 = 20.0;

    /// Water radius = base + sensitivity * step
    pub const BASE_IMPACT_RADIUS: f32 = 18.0;
    pub const IMPACT_RADIUS_PER_SENSITIVITY: f32 = 2.0;

    /// Chance of a splash cue per impacting frame
    pub const SPLASH_CHANCE: f64 = 0.1;

    /// Pause between questions (seconds)
    pub const TRANSITION_SECS: f32 = 1.2;
    /// Pause when a praise message is shown
    pub const PRAISE_TRANSITION_SECS: f32 = 2.2;
    /// Praise is shown every N solved questions
    pub const PRAISE_EVERY: u32 = 2;

    /// Scoring: base + max(0, (window - elapsed) * rate)
    pub const BASE_SCORE: u32 = 100;
    pub const SPEED_BONUS_WINDOW: f32 = 20.0;
    pub const SPEED_BONUS_RATE: f32 = 5.0;

    /// Wall rectangle as fractions of the play surface
    pub const WALL_TOP: f32 = 0.25;
    pub const WALL_BOTTOM: f32 = 0.72;
    pub const WALL_LEFT: f32 = 0.12;
    pub const WALL_RIGHT: f32 = 0.88;

    /// Full jitter spans applied to zone centers (pixels)
    pub const JITTER_X: f32 = 20.0;
    pub const JITTER_Y: f32 = 15.0;
    /// Full rotation span (radians, ~8.6 degrees)
    pub const ROTATION_SPAN: f32 = 0.15;

    /// Highest level id in the catalog
    pub const LEVEL_COUNT: u32 = 10;
}

/// Clamp a host frame delta so long stalls do not jump erosion or timers
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.016), 0.016);
        assert_eq!(clamp_dt(2.5), consts::MAX_FRAME_DT);
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
    }
}
