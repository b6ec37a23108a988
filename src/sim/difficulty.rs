//! Difficulty tiers and the spawn scheduler
//!
//! The scheduler decides *when* and *how many* entities spawn; the entity
//! manager decides *what* they are.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::EffectKind;
use crate::tuning::{TierSettings, Tuning};

/// Burst chance gained per unit of difficulty multiplier
const BURST_PER_MULT: f32 = 0.05;
/// Multiplier above which an occasional double-extra burst happens
const SURGE_THRESHOLD: f32 = 1.8;
const SURGE_CHANCE: f32 = 0.2;
const SURGE_EXTRA: u32 = 2;
/// Interval jitter range, breaks up a perceptible rhythm
const JITTER_MIN: f32 = 0.7;
const JITTER_MAX: f32 = 1.3;

/// Fruit rain overrides
const RAIN_INTERVAL: f32 = 10.0;
const RAIN_BURST_CHANCE: f32 = 0.8;
const RAIN_BASE_COUNT: u32 = 3;
const FRENZY_INTERVAL: f32 = 8.0;

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A spawn wave due this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnWave {
    pub count: u32,
    /// Multiplier in effect when the wave was scheduled
    pub multiplier: f32,
}

/// Spawn timer plus the escalating difficulty multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Frames until the next wave
    pub timer: f32,
    /// Grows with every wave up to the tier ceiling
    pub multiplier: f32,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self {
            timer: 0.0,
            multiplier: 1.0,
        }
    }
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one frame; returns the wave to spawn if the timer ran out
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tier: &TierSettings,
        tuning: &Tuning,
        active: Option<EffectKind>,
    ) -> Option<SpawnWave> {
        self.timer -= 1.0;
        if self.timer > 0.0 {
            return None;
        }

        let interval = match active {
            Some(EffectKind::FruitRain) => RAIN_INTERVAL,
            Some(EffectKind::Frenzy) => FRENZY_INTERVAL,
            _ => tier.spawn_interval,
        };

        let (mut count, chance) = match active {
            Some(EffectKind::FruitRain) => (RAIN_BASE_COUNT, RAIN_BURST_CHANCE),
            _ => (1, tier.burst_chance + self.multiplier * BURST_PER_MULT),
        };
        if rng.random::<f32>() < chance {
            count += rng.random_range(1..=2);
        }
        if self.multiplier > SURGE_THRESHOLD && rng.random::<f32>() < SURGE_CHANCE {
            count += SURGE_EXTRA;
        }

        let wave = SpawnWave {
            count,
            multiplier: self.multiplier,
        };

        self.multiplier = (self.multiplier + tuning.multiplier_step).min(tier.max_mult);
        let jitter = rng.random_range(JITTER_MIN..JITTER_MAX);
        self.timer = (interval / self.multiplier * jitter).max(tuning.spawn_floor);

        Some(wave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_first_tick_spawns() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut scheduler = SpawnScheduler::new();
        let wave = scheduler.tick(&mut rng, &tuning.medium, &tuning, None).unwrap();
        assert!(wave.count >= 1);
        assert_eq!(wave.multiplier, 1.0);
        assert!(scheduler.multiplier > 1.0);
        assert!(scheduler.timer >= tuning.spawn_floor);
    }

    #[test]
    fn test_waits_for_timer() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut scheduler = SpawnScheduler::new();
        scheduler.timer = 5.0;
        for _ in 0..4 {
            assert!(scheduler.tick(&mut rng, &tuning.easy, &tuning, None).is_none());
        }
        assert!(scheduler.tick(&mut rng, &tuning.easy, &tuning, None).is_some());
    }

    #[test]
    fn test_multiplier_hits_ceiling() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scheduler = SpawnScheduler::new();
        for _ in 0..1_000 {
            scheduler.timer = 0.0;
            scheduler.tick(&mut rng, &tuning.easy, &tuning, None);
        }
        assert_eq!(scheduler.multiplier, tuning.easy.max_mult);
    }

    #[test]
    fn test_fruit_rain_forces_burst() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut scheduler = SpawnScheduler::new();
        let wave = scheduler
            .tick(&mut rng, &tuning.medium, &tuning, Some(EffectKind::FruitRain))
            .unwrap();
        assert!(wave.count >= RAIN_BASE_COUNT);
        // Short fixed interval, jittered and divided by the multiplier
        assert!(scheduler.timer <= RAIN_INTERVAL * JITTER_MAX);
    }

    #[test]
    fn test_reset() {
        let mut scheduler = SpawnScheduler {
            timer: 12.0,
            multiplier: 2.5,
        };
        scheduler.reset();
        assert_eq!(scheduler, SpawnScheduler::new());
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }

    proptest! {
        #[test]
        fn spawn_timer_never_below_floor(
            seed in any::<u64>(),
            tier_idx in 0usize..3,
            start_mult in 1.0f32..5.0,
            effect_idx in 0usize..3,
        ) {
            let tuning = Tuning::default();
            let tier = [tuning.easy, tuning.medium, tuning.hard][tier_idx];
            let active = [None, Some(EffectKind::FruitRain), Some(EffectKind::Frenzy)][effect_idx];
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut scheduler = SpawnScheduler {
                timer: 0.0,
                multiplier: start_mult.min(tier.max_mult),
            };
            for _ in 0..50 {
                scheduler.timer = 0.0;
                prop_assert!(scheduler.tick(&mut rng, &tier, &tuning, active).is_some());
                prop_assert!(scheduler.timer >= tuning.spawn_floor);
            }
        }
    }
}
