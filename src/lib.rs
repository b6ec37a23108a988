//! Nose Slicer - head-tracked arcade slicing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, slicing, power-ups)
//! - `platform`: Input mapping and the browser host binding
//! - `persistence`: Versioned session snapshots
//! - `tuning`: Data-driven game balance
//! - `settings` / `highscores`: Player preferences and the best score

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::Error;
pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};
pub use tuning::{TierSettings, Tuning};

use glam::Vec2;

/// Game configuration constants
///
/// All simulation time is counted in frames of a display-synchronized loop.
pub mod consts {
    /// Nominal frame rate the frame counts below are tuned for
    pub const FPS: u32 = 60;

    /// Per-frame downward acceleration (pixels/frame²)
    pub const GRAVITY: f32 = 0.08;
    /// Base slicing radius around the cursor (pixels)
    pub const HITBOX_RADIUS: f32 = 80.0;
    /// Frames a combo survives without a new hit
    pub const COMBO_TIMER_MAX: u32 = 60;
    /// Frames a trail point stays alive
    pub const BLADE_LIFE: u32 = 20;

    /// Lives at the start of a run
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 6;

    /// Entity score values
    pub const POINTS_FRUIT: i64 = 3;
    pub const POINTS_BOMB: i64 = -6;
    pub const POINTS_SPECIAL: i64 = 10;
    pub const POINTS_SNITCH: i64 = 100;

    /// Entity radii (pixels)
    pub const FRUIT_RADIUS: f32 = 60.0;
    pub const SPECIAL_RADIUS: f32 = 50.0;
    pub const SNITCH_RADIUS: f32 = 30.0;

    /// Frames before another special may spawn after an effect ends
    pub const SPECIAL_COOLDOWN: u32 = 180;

    /// Cosmetic caps
    pub const MAX_PARTICLES: usize = 40;
    pub const MAX_SPLATS: usize = 20;

    /// Delay between a fatal hit and the game-over signal (500 ms)
    pub const GAME_OVER_DELAY: u32 = super::ms_to_frames(500);
    /// Delay between chain-reaction links (50 ms)
    pub const CHAIN_DELAY: u32 = super::ms_to_frames(50);
}

/// Reflect a point across the vertical center line of a viewport
#[inline]
pub fn mirror_x(point: Vec2, width: f32) -> Vec2 {
    Vec2::new(width - point.x, point.y)
}

/// Convert a duration in milliseconds to whole frames (rounded to nearest)
pub const fn ms_to_frames(ms: u32) -> u32 {
    (ms * consts::FPS + 500) / 1000
}
