//! Browser bindings
//!
//! The host page owns rendering and layout. It forwards pointer x (already
//! mapped to play-field percent), clicks and frame deltas, then reads back a
//! JSON snapshot and the drained event queue.

use wasm_bindgen::prelude::*;

use super::FrameClock;
use crate::sim::{GameSession, TickInput};
use crate::tuning::{AssetManifest, Tuning};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebClawGame {
    session: GameSession,
    clock: FrameClock,
    input: TickInput,
}

#[wasm_bindgen]
impl WebClawGame {
    /// New game. `tuning_json` and `manifest_json` may be empty to use
    /// defaults; invalid data is reported to the console and ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str, manifest_json: &str) -> WebClawGame {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).unwrap_or_else(|e| {
                log::error!("Bad tuning, using defaults: {}", e);
                Tuning::default()
            })
        };
        let manifest = if manifest_json.trim().is_empty() {
            AssetManifest::default()
        } else {
            AssetManifest::from_json(manifest_json).unwrap_or_else(|e| {
                log::warn!("Bad asset manifest, using placeholders: {}", e);
                AssetManifest::default()
            })
        };

        let seed = js_sys::Date::now() as u64;
        log::info!("Claw Grab starting (seed {})", seed);
        WebClawGame {
            session: GameSession::with_tuning(seed, tuning, manifest),
            clock: FrameClock::new(),
            input: TickInput::default(),
        }
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.input.pointer_x = Some(x);
    }

    pub fn trigger(&mut self) {
        self.input.trigger = true;
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn set_demo(&mut self, enabled: bool) {
        self.input.idle_mode = enabled;
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.clock = FrameClock::new();
        self.input = TickInput::default();
    }

    /// Advance by a frame delta in seconds
    pub fn update(&mut self, dt: f32) {
        self.clock.advance(&mut self.session, &mut self.input, dt);
    }

    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.session.view()).unwrap_or_default()
    }

    pub fn drain_events_json(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_default()
    }
}
