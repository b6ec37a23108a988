//! Cosmetic particles, juice splats and floating text
//!
//! Nothing here feeds back into gameplay. The system draws from its own RNG
//! so cosmetic load never shifts the gameplay random stream.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::{MAX_PARTICLES, MAX_SPLATS};

const TEXT_RISE: f32 = -2.0;
const TEXT_FADE: f32 = 0.02;
const TEXT_OFFSET: f32 = 50.0;

/// A single cosmetic particle
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1ish, removed at zero
    pub life: f32,
    pub color: &'static str,
    pub size: f32,
    pub gravity: f32,
    pub decay: f32,
}

/// A juice stain left behind by a sliced fruit
#[derive(Debug, Clone, Serialize)]
pub struct Splat {
    pub pos: Vec2,
    pub color: &'static str,
    pub size: f32,
    pub alpha: f32,
    pub rotation: f32,
}

/// Rising announcement text ("3 Combo", "Blocked", effect names)
#[derive(Debug, Clone, Serialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: &'static str,
    pub life: f32,
    pub vel_y: f32,
}

/// Burst recipe: count, speed spread, life, color, size range, gravity, decay
struct Burst {
    count: usize,
    spread: f32,
    life: (f32, f32),
    size: (f32, f32),
    gravity: f32,
    decay: (f32, f32),
}

const SMOKE: Burst = Burst {
    count: 20,
    spread: 15.0,
    life: (1.0, 0.0),
    size: (10.0, 15.0),
    gravity: -0.05,
    decay: (0.02, 0.0),
};
const FIRE: Burst = Burst {
    count: 30,
    spread: 30.0,
    life: (0.8, 0.0),
    size: (5.0, 10.0),
    gravity: 0.0,
    decay: (0.05, 0.0),
};
const SPARKS: Burst = Burst {
    count: 20,
    spread: 60.0,
    life: (0.5, 0.0),
    size: (3.0, 0.0),
    gravity: 0.1,
    decay: (0.1, 0.0),
};
const JUICE: Burst = Burst {
    count: 15,
    spread: 15.0,
    life: (1.0, 0.5),
    size: (6.0, 12.0),
    gravity: 0.2,
    decay: (0.01, 0.02),
};
const MIST: Burst = Burst {
    count: 15,
    spread: 35.0,
    life: (0.8, 0.0),
    size: (2.0, 6.0),
    gravity: 0.1,
    decay: (0.03, 0.0),
};
const DROPLETS: Burst = Burst {
    count: 10,
    spread: 50.0,
    life: (0.6, 0.0),
    size: (2.0, 5.0),
    gravity: 0.3,
    decay: (0.05, 0.0),
};

/// Owner of all cosmetic collections
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    splats: Vec<Splat>,
    texts: Vec<FloatingText>,
    max_particles: usize,
    rng: Pcg32,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            splats: Vec::new(),
            texts: Vec::new(),
            max_particles: MAX_PARTICLES,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Particle cap (0 disables particles entirely)
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        self.enforce_caps();
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.splats.clear();
        self.texts.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn splats(&self) -> &[Splat] {
        &self.splats
    }

    pub fn texts(&self) -> &[FloatingText] {
        &self.texts
    }

    /// Advance one frame
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += p.gravity;
            p.life -= p.decay;
        }
        self.particles.retain(|p| p.life > 0.0);

        for t in &mut self.texts {
            t.pos.y += t.vel_y;
            t.life -= TEXT_FADE;
        }
        self.texts.retain(|t| t.life > 0.0);

        self.enforce_caps();
    }

    fn enforce_caps(&mut self) {
        if self.splats.len() > MAX_SPLATS {
            let excess = self.splats.len() - MAX_SPLATS;
            self.splats.drain(..excess);
        }
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Small glitter around the cursor
    pub fn spawn_sparkles(&mut self, at: Vec2) {
        for _ in 0..2 {
            let rng = &mut self.rng;
            let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 20.0;
            let vel = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 2.0;
            let color = if rng.random::<bool>() { "#ffffff" } else { "#00ffff" };
            let size = rng.random::<f32>() * 3.0 + 1.0;
            self.particles.push(Particle {
                pos: at + offset,
                vel,
                life: 0.6,
                color,
                size,
                gravity: 0.0,
                decay: 0.05,
            });
        }
    }

    pub fn create_splat(&mut self, at: Vec2, color: &'static str) {
        let size = self.rng.random::<f32>() * 50.0 + 50.0;
        let rotation = self.rng.random::<f32>() * std::f32::consts::TAU;
        self.splats.push(Splat {
            pos: at,
            color,
            size,
            alpha: 0.8,
            rotation,
        });
    }

    pub fn create_floating_text(&mut self, at: Vec2, text: impl Into<String>, color: &'static str) {
        self.texts.push(FloatingText {
            pos: Vec2::new(at.x, at.y - TEXT_OFFSET),
            text: text.into(),
            color,
            life: 1.0,
            vel_y: TEXT_RISE,
        });
    }

    /// Smoke, fire and sparks for bombs; juice, mist and droplets for fruit
    pub fn create_explosion(&mut self, at: Vec2, color: &'static str, is_bomb: bool) {
        if is_bomb {
            self.burst(at, &SMOKE, |_| "#333333");
            self.burst(at, &FIRE, |rng| if rng.random::<bool>() { "#ff4500" } else { "#ff8800" });
            self.burst(at, &SPARKS, |_| "#ffff00");
        } else {
            self.burst(at, &JUICE, |_| color);
            self.burst(at, &MIST, |_| "#ffffffb3");
            self.burst(at, &DROPLETS, |_| color);
        }
    }

    fn burst(
        &mut self,
        at: Vec2,
        recipe: &Burst,
        mut pick_color: impl FnMut(&mut Pcg32) -> &'static str,
    ) {
        for _ in 0..recipe.count {
            let rng = &mut self.rng;
            let dir = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
            let vel = dir * recipe.spread;
            let life = recipe.life.0 + rng.random::<f32>() * recipe.life.1;
            let size = recipe.size.0 + rng.random::<f32>() * recipe.size.1;
            let decay = recipe.decay.0 + rng.random::<f32>() * recipe.decay.1;
            let color = pick_color(rng);
            self.particles.push(Particle {
                pos: at,
                vel,
                life,
                color,
                size,
                gravity: recipe.gravity,
                decay,
            });
        }
    }

    /// Random jitter in [-0.5, 0.5) per axis, scaled
    pub fn jitter(&mut self, scale: f32) -> Vec2 {
        Vec2::new(self.rng.random::<f32>() - 0.5, self.rng.random::<f32>() - 0.5) * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explosion_counts() {
        let mut ps = ParticleSystem::new(1);
        ps.set_max_particles(1_000);
        ps.create_explosion(Vec2::ZERO, "#ff0000", true);
        assert_eq!(ps.particles().len(), 70);
        ps.clear();
        ps.create_explosion(Vec2::ZERO, "#ff0000", false);
        assert_eq!(ps.particles().len(), 40);
    }

    #[test]
    fn test_caps_enforced_on_update() {
        let mut ps = ParticleSystem::new(2);
        ps.create_explosion(Vec2::ZERO, "#ff0000", true);
        for _ in 0..30 {
            ps.create_splat(Vec2::ZERO, "#00ff00");
        }
        ps.update();
        assert!(ps.particles().len() <= MAX_PARTICLES);
        assert_eq!(ps.splats().len(), MAX_SPLATS);
    }

    #[test]
    fn test_zero_cap_disables_particles() {
        let mut ps = ParticleSystem::new(3);
        ps.set_max_particles(0);
        ps.spawn_sparkles(Vec2::ZERO);
        ps.update();
        assert!(ps.particles().is_empty());
    }

    #[test]
    fn test_floating_text_rises_and_fades() {
        let mut ps = ParticleSystem::new(4);
        ps.create_floating_text(Vec2::new(100.0, 200.0), "2 Combo", "#ffd700");
        assert_eq!(ps.texts()[0].pos.y, 150.0);
        ps.update();
        assert_eq!(ps.texts()[0].pos.y, 148.0);
        for _ in 0..60 {
            ps.update();
        }
        assert!(ps.texts().is_empty());
    }
}
