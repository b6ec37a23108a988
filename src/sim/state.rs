//! Game state and core simulation types
//!
//! Everything needed to continue a session deterministically lives in
//! [`GameState`]. Cosmetic collections (particles, trail, shake) are skipped
//! on serialization and rebuilt empty on restore.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, SpawnScheduler};
use super::effects::ActiveEffect;
use super::entities::EntityManager;
use super::particles::ParticleSystem;
use super::schedule::Schedule;
use crate::tuning::Tuning;

/// Cosmetic RNG stream is derived from the run seed but never shares state
/// with the gameplay stream
const COSMETIC_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Bomb-hit shake
pub const SHAKE_INTENSITY: f32 = 60.0;
pub const SHAKE_DURATION: u32 = 40;
const SHAKE_DECAY: f32 = 0.9;

/// Trail flash lengths (frames)
pub const TRAIL_FRUIT_FRAMES: u32 = 8;
pub const TRAIL_FLASH_FRAMES: u32 = 20;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Waiting for the tracker to lock onto the player
    Calibration,
    /// Active gameplay
    Playing,
    /// Run ended; entered only through the delayed game-over event
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "MENU",
            GamePhase::Calibration => "CALIBRATION",
            GamePhase::Playing => "PLAYING",
            GamePhase::GameOver => "GAME_OVER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "menu" => Some(GamePhase::Menu),
            "calibration" => Some(GamePhase::Calibration),
            "playing" => Some(GamePhase::Playing),
            "game_over" | "gameover" => Some(GamePhase::GameOver),
            _ => None,
        }
    }
}

/// Smoothed cursor with the previous sample for swept collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub pos: Vec2,
    pub prev: Vec2,
    /// Tracker currently sees the player
    pub active: bool,
}

impl Cursor {
    pub fn centered(width: f32, height: f32) -> Self {
        let center = Vec2::new(width / 2.0, height / 2.0);
        Self {
            pos: center,
            prev: center,
            active: false,
        }
    }
}

/// Hit streak
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Frames left before the streak lapses
    pub timer: u32,
}

impl Combo {
    /// Register a frame with at least one new slice
    pub fn hit(&mut self, window: u32) {
        self.timer = window;
        self.count += 1;
    }

    /// One frame of decay. The count drops to zero once the window lapses.
    pub fn decay(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
        } else {
            self.count = 0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// 0..=1
    pub progress: f32,
    /// Completion already signalled for this calibration entry
    pub completed: bool,
}

/// Camera shake
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shake {
    pub intensity: f32,
    pub duration: u32,
    /// Offset for the current frame
    pub offset: Vec2,
}

impl Shake {
    pub fn trigger(&mut self) {
        self.intensity = SHAKE_INTENSITY;
        self.duration = SHAKE_DURATION;
    }

    /// Advance one frame using `jitter` in [-0.5, 0.5) per axis
    pub fn step(&mut self, jitter: Vec2) {
        if self.duration > 0 {
            self.offset = jitter * self.intensity;
            self.duration -= 1;
            self.intensity = (self.intensity * SHAKE_DECAY).max(0.0);
        } else {
            self.offset = Vec2::ZERO;
        }
    }
}

/// Blade trail sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Frames left
    pub life: u32,
}

/// Short-lived trail tint after a slice
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum TrailStyle {
    #[default]
    Normal,
    Fruit(&'static str),
    Bomb,
    Special(&'static str),
}

#[derive(Debug, Clone, Default)]
pub struct Trail {
    pub points: Vec<TrailPoint>,
    pub style: TrailStyle,
    pub style_timer: u32,
}

impl Trail {
    pub fn push(&mut self, pos: Vec2, life: u32) {
        self.points.push(TrailPoint { pos, life });
    }

    /// Set the flash style. Fruit flashes never override bomb or special ones.
    pub fn flash(&mut self, style: TrailStyle) {
        let frames = match style {
            TrailStyle::Normal => 0,
            TrailStyle::Fruit(_) => {
                if matches!(self.style, TrailStyle::Bomb | TrailStyle::Special(_)) {
                    return;
                }
                TRAIL_FRUIT_FRAMES
            }
            TrailStyle::Bomb | TrailStyle::Special(_) => TRAIL_FLASH_FRAMES,
        };
        self.style = style;
        self.style_timer = frames;
    }

    /// Age every point and drop dead ones, then run down the flash timer
    pub fn decay(&mut self) {
        for p in &mut self.points {
            p.life = p.life.saturating_sub(1);
        }
        self.points.retain(|p| p.life > 0);
        if self.style_timer > 0 {
            self.style_timer -= 1;
        } else {
            self.style = TrailStyle::Normal;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.style = TrailStyle::Normal;
        self.style_timer = 0;
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG (spawns, snitch flight, weighted draws)
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    pub width: f32,
    pub height: f32,
    pub entities: EntityManager,
    pub scheduler: SpawnScheduler,
    /// Single timed-effect slot
    pub effect: Option<ActiveEffect>,
    /// Frames before another special may spawn
    pub special_cooldown: u32,
    pub lives: u8,
    /// Running sum of all score deltas this session
    pub score: i64,
    pub combo: Combo,
    pub cursor: Cursor,
    pub calibration: Calibration,
    /// Deferred game-over and chain-reaction events
    pub schedule: Schedule,
    /// Session generation; bumped on every reset
    pub epoch: u32,
    /// Frames simulated since construction
    pub frame: u64,
    /// A fatal hit already scheduled the game-over event
    pub game_over_pending: bool,
    /// Visual-only state
    #[serde(skip)]
    pub particles: ParticleSystem,
    #[serde(skip)]
    pub trail: Trail,
    #[serde(skip)]
    pub shake: Shake,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, width: f32, height: f32, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty: Difficulty::default(),
            phase: GamePhase::Menu,
            width,
            height,
            entities: EntityManager::new(width, height),
            scheduler: SpawnScheduler::new(),
            effect: None,
            special_cooldown: 0,
            lives: tuning.starting_lives,
            score: 0,
            combo: Combo::default(),
            cursor: Cursor::centered(width, height),
            calibration: Calibration::default(),
            schedule: Schedule::new(),
            epoch: 0,
            frame: 0,
            game_over_pending: false,
            particles: ParticleSystem::new(seed ^ COSMETIC_SEED_SALT),
            trail: Trail::default(),
            shake: Shake::default(),
            tuning,
        }
    }

    /// Hitbox radius with any size modifier applied
    pub fn hitbox_radius(&self) -> f32 {
        let scale = self.effect.map_or(1.0, |e| e.kind.hitbox_scale());
        self.tuning.hitbox_radius * scale
    }

    pub fn active_kind(&self) -> Option<super::effects::EffectKind> {
        self.effect.map(|e| e.kind)
    }

    /// Gate for the next special spawn
    pub fn special_allowed(&self) -> bool {
        self.special_cooldown == 0 && self.effect.is_none() && !self.entities.has_live_special()
    }

    /// Rebuild cosmetic state after deserialization
    pub fn reseed_cosmetics(&mut self) {
        self.particles = ParticleSystem::new(self.seed ^ COSMETIC_SEED_SALT ^ self.frame);
        self.trail = Trail::default();
        self.shake = Shake::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_lapses() {
        let mut combo = Combo::default();
        combo.hit(2);
        combo.hit(2);
        assert_eq!(combo.count, 2);
        combo.decay();
        combo.decay();
        assert_eq!(combo.count, 2);
        combo.decay();
        assert_eq!(combo.count, 0);
    }

    #[test]
    fn test_trail_fruit_does_not_override_bomb() {
        let mut trail = Trail::default();
        trail.flash(TrailStyle::Bomb);
        trail.flash(TrailStyle::Fruit("#ff0000"));
        assert_eq!(trail.style, TrailStyle::Bomb);
        assert_eq!(trail.style_timer, TRAIL_FLASH_FRAMES);
    }

    #[test]
    fn test_trail_style_expires() {
        let mut trail = Trail::default();
        trail.flash(TrailStyle::Fruit("#00ff00"));
        for _ in 0..=TRAIL_FRUIT_FRAMES {
            trail.decay();
        }
        assert_eq!(trail.style, TrailStyle::Normal);
    }

    #[test]
    fn test_trail_points_die() {
        let mut trail = Trail::default();
        trail.push(Vec2::ZERO, 2);
        trail.decay();
        assert_eq!(trail.points.len(), 1);
        trail.decay();
        assert!(trail.points.is_empty());
    }

    #[test]
    fn test_shake_decays() {
        let mut shake = Shake::default();
        shake.trigger();
        shake.step(Vec2::new(0.5, -0.5));
        assert_eq!(shake.offset, Vec2::new(30.0, -30.0));
        assert!(shake.intensity < SHAKE_INTENSITY);
        for _ in 0..SHAKE_DURATION {
            shake.step(Vec2::new(0.5, 0.5));
        }
        assert_eq!(shake.offset, Vec2::ZERO);
    }

    #[test]
    fn test_phase_parse() {
        assert_eq!(GamePhase::parse("game-over"), Some(GamePhase::GameOver));
        assert_eq!(GamePhase::parse("PLAYING"), Some(GamePhase::Playing));
        assert_eq!(GamePhase::parse("paused"), None);
    }

    #[test]
    fn test_state_serde_skips_cosmetics() {
        let mut state = GameState::new(5, 800.0, 600.0, Tuning::default());
        state.trail.push(Vec2::ZERO, 10);
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert!(restored.trail.points.is_empty());
        assert_eq!(restored.seed, 5);
        assert_eq!(restored.rng, state.rng);
    }
}
