//! Data-driven game balance
//!
//! Every number the simulation reads at runtime lives here so a host can
//! ship alternative balance as JSON. `Tuning::default()` reproduces the
//! shipped game.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::Difficulty;

/// Spawn and hazard parameters for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSettings {
    /// Base frames between spawn waves
    pub spawn_interval: f32,
    /// Base probability that a spawn is a bomb
    pub bomb_chance: f32,
    /// Launch speed multiplier
    pub speed_mult: f32,
    /// Base probability of a burst (extra simultaneous spawns)
    pub burst_chance: f32,
    /// Ceiling for the difficulty multiplier
    pub max_mult: f32,
}

impl TierSettings {
    pub const EASY: Self = Self {
        spawn_interval: 55.0,
        bomb_chance: 0.05,
        speed_mult: 0.85,
        burst_chance: 0.1,
        max_mult: 1.5,
    };

    pub const MEDIUM: Self = Self {
        spawn_interval: 35.0,
        bomb_chance: 0.20,
        speed_mult: 1.0,
        burst_chance: 0.3,
        max_mult: 3.0,
    };

    pub const HARD: Self = Self {
        spawn_interval: 25.0,
        bomb_chance: 0.35,
        speed_mult: 1.25,
        burst_chance: 0.5,
        max_mult: 5.0,
    };
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub hitbox_radius: f32,
    pub combo_timer_max: u32,
    pub blade_life: u32,
    /// Exponential smoothing factor applied to raw cursor samples
    pub cursor_smoothing: f32,

    pub starting_lives: u8,
    pub max_lives: u8,

    /// Frames after an effect ends before another special may spawn
    pub special_cooldown: u32,
    /// Chance that an eligible spawn becomes a special
    pub special_chance: f32,
    /// Side chance that an eligible spawn becomes the golden snitch
    pub snitch_chance: f32,

    pub chain_radius: f32,
    /// Frames between chain-reaction links
    pub chain_delay: u32,
    pub magnet_radius: f32,
    /// Fraction of the distance to the cursor covered per frame
    pub magnet_pull: f32,

    /// Frames between a fatal hit and the game-over signal
    pub game_over_delay: u32,

    /// Minimum frames between spawn waves
    pub spawn_floor: f32,
    /// Difficulty multiplier gain per spawn wave
    pub multiplier_step: f32,

    pub easy: TierSettings,
    pub medium: TierSettings,
    pub hard: TierSettings,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            hitbox_radius: HITBOX_RADIUS,
            combo_timer_max: COMBO_TIMER_MAX,
            blade_life: BLADE_LIFE,
            cursor_smoothing: 0.2,

            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,

            special_cooldown: SPECIAL_COOLDOWN,
            special_chance: 0.08,
            snitch_chance: 0.01,

            chain_radius: 300.0,
            chain_delay: CHAIN_DELAY,
            magnet_radius: 400.0,
            magnet_pull: 0.05,

            game_over_delay: GAME_OVER_DELAY,

            spawn_floor: 10.0,
            multiplier_step: 0.002,

            easy: TierSettings::EASY,
            medium: TierSettings::MEDIUM,
            hard: TierSettings::HARD,
        }
    }
}

impl Tuning {
    /// Settings for a difficulty tier
    pub fn tier(&self, difficulty: Difficulty) -> &TierSettings {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Parse a tuning table from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would cause runaway spawning or broken state
    pub fn validate(&self) -> Result<()> {
        let probability = |name: &str, p: f32| {
            if (0.0..=1.0).contains(&p) {
                Ok(())
            } else {
                Err(Error::InvalidTuning(format!("{name} must be in [0, 1], got {p}")))
            }
        };

        if self.spawn_floor < 1.0 {
            return Err(Error::InvalidTuning(format!(
                "spawn_floor must be at least 1 frame, got {}",
                self.spawn_floor
            )));
        }
        if self.max_lives == 0 || self.starting_lives > self.max_lives {
            return Err(Error::InvalidTuning(format!(
                "starting_lives {} must be within 1..={}",
                self.starting_lives, self.max_lives
            )));
        }
        if !(self.cursor_smoothing > 0.0 && self.cursor_smoothing <= 1.0) {
            return Err(Error::InvalidTuning(format!(
                "cursor_smoothing must be in (0, 1], got {}",
                self.cursor_smoothing
            )));
        }
        probability("special_chance", self.special_chance)?;
        probability("snitch_chance", self.snitch_chance)?;

        for (name, tier) in [("easy", &self.easy), ("medium", &self.medium), ("hard", &self.hard)] {
            if tier.spawn_interval <= 0.0 {
                return Err(Error::InvalidTuning(format!("{name}.spawn_interval must be positive")));
            }
            if tier.max_mult < 1.0 {
                return Err(Error::InvalidTuning(format!("{name}.max_mult must be at least 1")));
            }
            probability(&format!("{name}.bomb_chance"), tier.bomb_chance)?;
            probability(&format!("{name}.burst_chance"), tier.burst_chance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "hitbox_radius": 50.0 }"#).unwrap();
        assert_eq!(tuning.hitbox_radius, 50.0);
        assert_eq!(tuning.hard, TierSettings::HARD);
        assert_eq!(tuning.combo_timer_max, COMBO_TIMER_MAX);
    }

    #[test]
    fn test_rejects_zero_floor() {
        let err = Tuning::from_json(r#"{ "spawn_floor": 0.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut tuning = Tuning::default();
        tuning.medium.bomb_chance = 1.5;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(Tuning::from_json("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_tier_lookup() {
        let tuning = Tuning::default();
        assert_eq!(tuning.tier(Difficulty::Easy).spawn_interval, 55.0);
        assert_eq!(tuning.tier(Difficulty::Hard).max_mult, 5.0);
    }
}
