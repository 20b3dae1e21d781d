//! Browser bindings
//!
//! A thin `wasm_bindgen` facade over [`Session`]: the page feeds pointer
//! input and frame deltas, and reads back events and frame snapshots as
//! JSON. Drawing stays on the JavaScript side.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::progress::{PersistentProgress, ProgressStore};
use crate::settings::Settings;
use crate::sim::{Session, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Graffiti Wash starting...");
}

/// Game instance owned by the page
#[wasm_bindgen]
pub struct WebGame {
    session: Session<PersistentProgress>,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        log::info!("New game {}x{} (seed {})", width, height, seed);
        WebGame {
            session: Session::new(PersistentProgress::load(), Settings::load(), seed, width, height),
            input: TickInput::default(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    pub fn set_aim(&mut self, x: f32, y: f32) {
        self.input.aim = Vec2::new(x, y);
    }

    pub fn set_firing(&mut self, firing: bool) {
        self.input.firing = firing;
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.input.autoplay = autoplay;
    }

    pub fn set_sensitivity(&mut self, sensitivity: u8) {
        self.session.settings.set_sensitivity(sensitivity);
        self.session.settings.save();
    }

    /// Advance by `dt` seconds; returns the frame's events as JSON
    pub fn update(&mut self, dt: f32) -> String {
        let events = tick(&mut self.session, &self.input, dt);
        self.input.pause = false;
        to_json(&events)
    }

    /// Pause toggle is applied on the next update
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    /// Start a level; returns the first question's event as JSON
    pub fn start_level(&mut self, level_id: u32) -> Result<String, JsValue> {
        self.session
            .start_level(level_id)
            .map(|event| to_json(&event))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn restart_level(&mut self) -> Result<String, JsValue> {
        self.session
            .restart_level()
            .map(|event| to_json(&event))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Next level's first question as JSON, or `null` when back at the menu
    pub fn next_level(&mut self) -> Result<String, JsValue> {
        self.session
            .next_level()
            .map(|event| to_json(&event))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn quit_to_menu(&mut self) {
        self.session.quit_to_menu();
    }

    pub fn is_unlocked(&self, level_id: u32) -> bool {
        self.session.store.is_unlocked(level_id)
    }

    /// Snapshot of the HUD and tiles as JSON
    pub fn frame(&self) -> String {
        to_json(&self.session.frame())
    }

    /// Per-cell paint opacity of one tile (row-major), for canvas upload
    pub fn tile_opacity(&self, tile: usize) -> Vec<u8> {
        self.session
            .round()
            .and_then(|r| r.answers.get(tile))
            .map(|a| a.opacity())
            .unwrap_or_default()
    }

    /// Water particles as JSON
    pub fn water(&self) -> String {
        to_json(&self.session.water)
    }

    /// Saved progress as JSON
    pub fn progress(&self) -> String {
        to_json(&self.session.store.data)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize: {}", e);
        "null".to_string()
    })
}
