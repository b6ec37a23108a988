//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Frame-stepped only
//! - Seeded RNG only (gameplay and cosmetics on separate streams)
//! - Stable iteration order (entity storage order)
//! - No rendering or platform dependencies

pub mod callbacks;
pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod entities;
pub mod frame;
pub mod geometry;
pub mod particles;
pub mod schedule;
pub mod state;
pub mod tick;

pub use callbacks::{GameCallbacks, Recorder};
pub use collision::segment_hits;
pub use difficulty::{Difficulty, SpawnScheduler, SpawnWave};
pub use effects::{ActiveEffect, EffectInfo, EffectKind};
pub use entities::{Entity, EntityKind, EntityManager, FruitKind};
pub use frame::{EffectView, EntityView, FrameView, TrailLook};
pub use particles::ParticleSystem;
pub use schedule::{DeferredEvent, Schedule};
pub use state::{Combo, Cursor, GamePhase, GameState, TrailPoint, TrailStyle};
pub use tick::{CursorSample, GameEngine, SliceOutcome, TickInput};
