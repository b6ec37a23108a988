//! Outward notifications from the engine to its host
//!
//! The table is handed to the engine once at construction. Every method has
//! a no-op default so hosts only implement what they display.

use glam::Vec2;

use super::effects::ActiveEffect;

pub trait GameCallbacks {
    /// Score changed by `delta` (may be zero)
    fn on_score_update(&mut self, _delta: i64) {}
    fn on_lives_update(&mut self, _lives: u8) {}
    /// A bomb hit landed
    fn on_damage(&mut self) {}
    /// Fired once, a short delay after the fatal hit
    fn on_game_over(&mut self) {}
    /// Fired once per calibration entry
    fn on_calibration_complete(&mut self) {}
    fn on_cursor_active(&mut self, _active: bool) {}
    fn on_calibration_progress(&mut self, _progress: f32) {}
    fn on_cursor_move(&mut self, _pos: Vec2) {}
    /// The timed-effect slot changed (`None` when it empties)
    fn on_effect_change(&mut self, _effect: Option<ActiveEffect>) {}
}

/// Host that ignores every notification
impl GameCallbacks for () {}

/// Counts of every notification, for tests and the headless runner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    pub score_deltas: Vec<i64>,
    pub lives: Vec<u8>,
    pub damage: u32,
    pub game_over: u32,
    pub calibration_complete: u32,
    pub cursor_active: Vec<bool>,
    pub last_progress: f32,
    pub cursor_moves: u32,
    pub effects: Vec<Option<ActiveEffect>>,
}

impl Recorder {
    pub fn total_score(&self) -> i64 {
        self.score_deltas.iter().sum()
    }
}

impl GameCallbacks for Recorder {
    fn on_score_update(&mut self, delta: i64) {
        self.score_deltas.push(delta);
    }

    fn on_lives_update(&mut self, lives: u8) {
        self.lives.push(lives);
    }

    fn on_damage(&mut self) {
        self.damage += 1;
    }

    fn on_game_over(&mut self) {
        self.game_over += 1;
    }

    fn on_calibration_complete(&mut self) {
        self.calibration_complete += 1;
    }

    fn on_cursor_active(&mut self, active: bool) {
        self.cursor_active.push(active);
    }

    fn on_calibration_progress(&mut self, progress: f32) {
        self.last_progress = progress;
    }

    fn on_cursor_move(&mut self, _pos: Vec2) {
        self.cursor_moves += 1;
    }

    fn on_effect_change(&mut self, effect: Option<ActiveEffect>) {
        self.effects.push(effect);
    }
}
