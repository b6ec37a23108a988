//! Browser host binding
//!
//! The page owns the camera, the face tracker and the canvas. It feeds
//! cursor samples in, calls `tick()` from `requestAnimationFrame`, and draws
//! whatever `frame_json()` returns. Engine notifications go to a single JS
//! function as `(name, payload)`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::highscores::HighScore;
use crate::persistence;
use crate::platform::nose_to_viewport;
use crate::settings::Settings;
use crate::sim::{
    ActiveEffect, Difficulty, EffectView, GameCallbacks, GameEngine, GamePhase, TickInput,
};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read a LocalStorage entry. Missing storage and missing keys both read as `None`.
pub(crate) fn read_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

/// Write a LocalStorage entry; false if storage is unavailable or full
pub(crate) fn write_item(key: &str, value: &str) -> bool {
    match local_storage() {
        Some(storage) => storage.set_item(key, value).is_ok(),
        None => false,
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
    log::info!("Nose Slicer starting...");
}

/// Forwards notifications to a JS handler. Exceptions thrown by the handler
/// are logged and swallowed so they never reach the frame loop.
struct JsCallbacks {
    handler: js_sys::Function,
}

impl JsCallbacks {
    fn emit(&self, name: &str, payload: JsValue) {
        if let Err(e) = self.handler.call2(&JsValue::NULL, &JsValue::from_str(name), &payload) {
            log::warn!("Host callback {} threw: {:?}", name, e);
        }
    }
}

impl GameCallbacks for JsCallbacks {
    fn on_score_update(&mut self, delta: i64) {
        self.emit("score", JsValue::from_f64(delta as f64));
    }

    fn on_lives_update(&mut self, lives: u8) {
        self.emit("lives", JsValue::from(lives));
    }

    fn on_damage(&mut self) {
        self.emit("damage", JsValue::UNDEFINED);
    }

    fn on_game_over(&mut self) {
        self.emit("gameOver", JsValue::UNDEFINED);
    }

    fn on_calibration_complete(&mut self) {
        self.emit("calibrationComplete", JsValue::UNDEFINED);
    }

    fn on_cursor_active(&mut self, active: bool) {
        self.emit("cursorActive", JsValue::from_bool(active));
    }

    fn on_calibration_progress(&mut self, progress: f32) {
        self.emit("calibrationProgress", JsValue::from_f64(f64::from(progress)));
    }

    fn on_cursor_move(&mut self, pos: Vec2) {
        let payload = js_sys::Array::of2(
            &JsValue::from_f64(f64::from(pos.x)),
            &JsValue::from_f64(f64::from(pos.y)),
        );
        self.emit("cursorMove", payload.into());
    }

    fn on_effect_change(&mut self, effect: Option<ActiveEffect>) {
        match serde_json::to_string(&effect.map(EffectView::from)) {
            Ok(json) => self.emit("effect", JsValue::from_str(&json)),
            Err(e) => log::warn!("Failed to encode effect: {}", e),
        }
    }
}

#[wasm_bindgen]
pub struct WasmGame {
    engine: GameEngine<JsCallbacks>,
    high_score: HighScore,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, width: f32, height: f32, handler: js_sys::Function) -> WasmGame {
        let mut engine = GameEngine::new(seed as u64, width, height, JsCallbacks { handler });
        engine.apply_settings(&Settings::load());
        WasmGame {
            engine,
            high_score: HighScore::load(),
        }
    }

    /// Resume a session saved with `save_session`
    pub fn restore(json: &str, handler: js_sys::Function) -> Result<WasmGame, JsValue> {
        let state =
            persistence::restore_session(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut engine = GameEngine::from_state(state, JsCallbacks { handler });
        engine.apply_settings(&Settings::load());
        Ok(WasmGame {
            engine,
            high_score: HighScore::load(),
        })
    }

    /// Resume the session kept in LocalStorage, if there is a usable one
    pub fn resume_stored(handler: js_sys::Function) -> Option<WasmGame> {
        let state = persistence::load_stored_session()?;
        let mut engine = GameEngine::from_state(state, JsCallbacks { handler });
        engine.apply_settings(&Settings::load());
        Some(WasmGame {
            engine,
            high_score: HighScore::load(),
        })
    }

    pub fn set_phase(&mut self, name: &str) -> Result<(), JsValue> {
        let phase = GamePhase::parse(name).ok_or_else(|| JsValue::from_str("unknown phase"))?;
        self.engine.set_phase(phase);
        Ok(())
    }

    pub fn set_difficulty(&mut self, name: &str) -> Result<(), JsValue> {
        let difficulty =
            Difficulty::parse(name).ok_or_else(|| JsValue::from_str("unknown difficulty"))?;
        self.engine.set_difficulty(difficulty);
        Ok(())
    }

    /// Apply preferences from the settings screen and remember them
    pub fn apply_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.engine.apply_settings(&settings);
        settings.save();
        Ok(())
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.resize(width, height);
    }

    /// Cursor target in viewport pixels
    pub fn cursor(&mut self, x: f32, y: f32) {
        self.engine.update_cursor(Vec2::new(x, y));
    }

    /// Raw nose landmark in normalized camera coordinates
    pub fn nose(&mut self, x: f32, y: f32) {
        let state = self.engine.state();
        let target = nose_to_viewport(Vec2::new(x, y), state.width, state.height);
        self.engine.update_cursor(target);
    }

    pub fn cursor_lost(&mut self) {
        self.engine.cursor_lost();
    }

    pub fn tick(&mut self) {
        self.engine.tick(&TickInput::default());
        if self.high_score.submit(self.engine.score()) {
            self.high_score.save();
        }
    }

    pub fn score(&self) -> f64 {
        self.engine.score() as f64
    }

    pub fn lives(&self) -> u8 {
        self.engine.lives()
    }

    pub fn high_score(&self) -> f64 {
        self.high_score.best as f64
    }

    pub fn frame_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.frame()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn save_session(&self) -> Result<String, JsValue> {
        persistence::save_session(self.engine.state())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Store the session in LocalStorage
    pub fn store_session(&self) {
        persistence::store_session(self.engine.state());
    }
}
