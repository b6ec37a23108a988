//! Falling entities and the manager that owns them
//!
//! The manager is the only owner of the live set. Everything else refers to
//! entities by id and asks the manager for access.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::effects::EffectKind;
use crate::consts::*;
use crate::tuning::Tuning;

/// Spawn offset outside the viewport
const SPAWN_OUTSET: f32 = 60.0;
/// Horizontal keep-out for bottom spawns
const SPAWN_MARGIN: f32 = 100.0;
/// Past this far outside the viewport a falling entity counts as missed
const MISS_MARGIN: f32 = 100.0;
/// Past this far outside the viewport an entity is dropped outright
const CULL_MARGIN: f32 = 200.0;
/// Pull toward screen center for bottom spawns
const CENTER_BIAS: f32 = 0.015;

const FRENZY_SPEED: f32 = 1.5;
const SLOW_SPAWN_SPEED: f32 = 0.6;
const FRENZY_BOMB_CHANCE: f32 = 0.1;
const BOMB_PER_MULT: f32 = 0.05;
const ANTI_GRAVITY_SCALE: f32 = 1.5;
const ANTI_GRAVITY_DRAG: f32 = 0.99;

const SNITCH_JITTER: f32 = 3.0;
const SNITCH_MAX_SPEED: f32 = 25.0;
const SNITCH_DAMPING: f32 = 0.9;
const SNITCH_EDGE: f32 = 50.0;
const SNITCH_NUDGE: f32 = 2.0;
/// Frames the snitch keeps dodging before it flies away
const SNITCH_LINGER: u32 = 480;
const SNITCH_ESCAPE_LIFT: f32 = 0.3;

const SWARM_SIZE: usize = 5;

/// Plain fruit skins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Banana,
    Watermelon,
    Grape,
    Orange,
    Pineapple,
    Kiwi,
    Coconut,
}

impl FruitKind {
    pub const ALL: [FruitKind; 8] = [
        FruitKind::Apple,
        FruitKind::Banana,
        FruitKind::Watermelon,
        FruitKind::Grape,
        FruitKind::Orange,
        FruitKind::Pineapple,
        FruitKind::Kiwi,
        FruitKind::Coconut,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            FruitKind::Apple => "🍎",
            FruitKind::Banana => "🍌",
            FruitKind::Watermelon => "🍉",
            FruitKind::Grape => "🍇",
            FruitKind::Orange => "🍊",
            FruitKind::Pineapple => "🍍",
            FruitKind::Kiwi => "🥝",
            FruitKind::Coconut => "🥥",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            FruitKind::Apple => "#ff4d4d",
            FruitKind::Banana => "#ffe135",
            FruitKind::Watermelon => "#ff6b6b",
            FruitKind::Grape => "#ba55d3",
            FruitKind::Orange => "#ffa500",
            FruitKind::Pineapple => "#ffff00",
            FruitKind::Kiwi => "#8ee53f",
            FruitKind::Coconut => "#f0f0f0",
        }
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Fruit(FruitKind),
    Bomb,
    /// Carries a modifier that activates when sliced
    Special(EffectKind),
}

impl EntityKind {
    pub fn default_radius(self) -> f32 {
        match self {
            EntityKind::Special(EffectKind::GoldenSnitch) => SNITCH_RADIUS,
            EntityKind::Special(_) => SPECIAL_RADIUS,
            EntityKind::Fruit(_) | EntityKind::Bomb => FRUIT_RADIUS,
        }
    }

    pub fn default_score(self) -> i64 {
        match self {
            EntityKind::Special(EffectKind::GoldenSnitch) => POINTS_SNITCH,
            EntityKind::Special(_) => POINTS_SPECIAL,
            EntityKind::Bomb => POINTS_BOMB,
            EntityKind::Fruit(_) => POINTS_FRUIT,
        }
    }
}

/// A falling object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub radius: f32,
    pub score_value: i64,
    /// One-way: a sliced entity is inert and goes away at the next cull
    pub sliced: bool,
    /// Frames since spawn
    #[serde(default)]
    pub age: u32,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            rotation: 0.0,
            rotation_speed: 0.0,
            radius: kind.default_radius(),
            score_value: kind.default_score(),
            sliced: false,
            age: 0,
        }
    }

    pub fn is_bomb(&self) -> bool {
        self.kind == EntityKind::Bomb
    }

    pub fn effect(&self) -> Option<EffectKind> {
        match self.kind {
            EntityKind::Special(effect) => Some(effect),
            _ => None,
        }
    }

    pub fn is_snitch(&self) -> bool {
        self.effect() == Some(EffectKind::GoldenSnitch)
    }

    pub fn emoji(&self) -> &'static str {
        match self.kind {
            EntityKind::Fruit(fruit) => fruit.emoji(),
            EntityKind::Bomb => "💣",
            EntityKind::Special(effect) => effect.info().emoji,
        }
    }

    pub fn color(&self) -> &'static str {
        match self.kind {
            EntityKind::Fruit(fruit) => fruit.color(),
            EntityKind::Bomb => "#333333",
            EntityKind::Special(effect) => effect.info().color,
        }
    }

    /// Mark as sliced. Returns false if it already was.
    pub fn slice(&mut self) -> bool {
        if self.sliced {
            return false;
        }
        self.sliced = true;
        true
    }
}

#[inline]
fn signed_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() - 0.5
}

/// Owner of the live entity set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityManager {
    entities: Vec<Entity>,
    width: f32,
    height: f32,
    next_id: u32,
}

impl EntityManager {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            entities: Vec::new(),
            width,
            height,
            next_id: 1,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// All entities including ones sliced this frame
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn live(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.sliced)
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn has_live_special(&self) -> bool {
        self.live().any(|e| e.effect().is_some())
    }

    /// Insert an entity with default radius and score for its kind
    pub fn spawn_at(&mut self, kind: EntityKind, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity::new(id, kind, pos, vel));
        id
    }

    /// Spawn one entity with randomized type and launch kinematics
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tuning: &Tuning,
        difficulty: Difficulty,
        multiplier: f32,
        active: Option<EffectKind>,
        special_allowed: bool,
    ) -> u32 {
        let tier = tuning.tier(difficulty);

        let is_bomb = match active {
            Some(effect) if effect.suppresses_bombs() => false,
            Some(EffectKind::Frenzy) => rng.random::<f32>() < FRENZY_BOMB_CHANCE,
            _ => rng.random::<f32>() < tier.bomb_chance + multiplier * BOMB_PER_MULT,
        };

        let special = if !is_bomb && special_allowed && active.is_none() {
            if rng.random::<f32>() < tuning.special_chance {
                Some(EffectKind::draw(rng))
            } else if rng.random::<f32>() < tuning.snitch_chance {
                Some(EffectKind::GoldenSnitch)
            } else {
                None
            }
        } else {
            None
        };

        let kind = match special {
            Some(effect) => EntityKind::Special(effect),
            None if is_bomb => EntityKind::Bomb,
            None => EntityKind::Fruit(FruitKind::ALL[rng.random_range(0..FruitKind::ALL.len())]),
        };

        let speed = tier.speed_mult
            * match active {
                Some(EffectKind::Frenzy) => FRENZY_SPEED,
                Some(EffectKind::SlowMotion) => SLOW_SPAWN_SPEED,
                _ => 1.0,
            };

        let (w, h) = (self.width, self.height);
        let source = rng.random::<f32>();
        let (mut pos, mut vel) = if active == Some(EffectKind::AntiGravity) {
            if source < 0.6 {
                // Top: launched downward, gravity turns it around
                let x = SPAWN_MARGIN + rng.random::<f32>() * (w - SPAWN_MARGIN * 2.0);
                let vx = signed_unit(rng) * 10.0 * speed;
                let vy = (rng.random::<f32>() * 7.0 + 10.0) * speed;
                (Vec2::new(x, -SPAWN_OUTSET), Vec2::new(vx, vy))
            } else {
                let left = source < 0.8;
                let x = if left { -SPAWN_OUTSET } else { w + SPAWN_OUTSET };
                let dir = if left { 1.0 } else { -1.0 };
                let vx = dir * (10.0 + rng.random::<f32>() * 10.0) * speed;
                let vy = rng.random::<f32>() * 10.0 * speed;
                (Vec2::new(x, h * 0.2), Vec2::new(vx, vy))
            }
        } else if source < 0.6 {
            // Bottom, biased toward the center to keep arcs on screen
            let x = SPAWN_MARGIN + rng.random::<f32>() * (w - SPAWN_MARGIN * 2.0);
            let bias = (w / 2.0 - x) * CENTER_BIAS;
            let vx = (signed_unit(rng) * 10.0 + bias) * speed;
            let vy = -(rng.random::<f32>() * 7.0 + 16.0 + multiplier * 0.5) * speed;
            (Vec2::new(x, h + SPAWN_OUTSET), Vec2::new(vx, vy))
        } else {
            let left = source < 0.8;
            let x = if left { -SPAWN_OUTSET } else { w + SPAWN_OUTSET };
            let dir = if left { 1.0 } else { -1.0 };
            let y = h * (0.5 + rng.random::<f32>() * 0.4);
            let vx = dir * (rng.random::<f32>() * 10.0 + 10.0 + multiplier) * speed;
            let vy = -(rng.random::<f32>() * 10.0 + 12.0) * speed;
            (Vec2::new(x, y), Vec2::new(vx, vy))
        };

        pos += Vec2::new(signed_unit(rng), signed_unit(rng)) * 10.0;
        if kind == EntityKind::Special(EffectKind::GoldenSnitch) {
            vel *= 2.0;
        }

        let id = self.spawn_at(kind, pos, vel);
        let rotation = rng.random::<f32>() * std::f32::consts::PI;
        let rotation_speed = signed_unit(rng) * 0.4;
        if let Some(entity) = self.entities.last_mut() {
            entity.rotation = rotation;
            entity.rotation_speed = rotation_speed;
        }
        log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
        id
    }

    /// Launch a row of bombs from just below the viewport
    pub fn spawn_bomb_swarm<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..SWARM_SIZE {
            let x = self.width * (0.2 + 0.6 * (i as f32 / (SWARM_SIZE - 1) as f32));
            let y = self.height + 50.0 + (i % 2) as f32 * 50.0;
            let vel = Vec2::new(signed_unit(rng) * 5.0, -(rng.random::<f32>() * 5.0 + 15.0));
            self.spawn_at(EntityKind::Bomb, Vec2::new(x, y), vel);
            if let Some(bomb) = self.entities.last_mut() {
                bomb.rotation_speed = 0.1;
            }
        }
    }

    /// Integrate one frame of motion, flag misses, and cull
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tuning: &Tuning,
        active: Option<EffectKind>,
        cursor: Vec2,
    ) {
        let (w, h) = (self.width, self.height);

        if active != Some(EffectKind::Freeze) {
            let slow = active == Some(EffectKind::SlowMotion);
            let anti_gravity = active == Some(EffectKind::AntiGravity);

            for entity in self.entities.iter_mut().filter(|e| !e.sliced) {
                entity.age += 1;
                let mut gravity = tuning.gravity;

                if entity.is_snitch() {
                    Self::steer_snitch(entity, rng, w, h);
                    gravity = 0.0;
                }

                let mut vel = entity.vel;
                if slow {
                    vel *= 0.5;
                    gravity *= 0.5;
                }
                if anti_gravity {
                    vel.x *= ANTI_GRAVITY_DRAG;
                    if !entity.is_snitch() {
                        gravity = -tuning.gravity * ANTI_GRAVITY_SCALE;
                    }
                }

                if active == Some(EffectKind::Magnet) && !entity.is_bomb() {
                    let to_cursor = cursor - entity.pos;
                    if to_cursor.length() < tuning.magnet_radius {
                        entity.pos += to_cursor * tuning.magnet_pull;
                    }
                }

                entity.pos += vel;
                entity.vel.y += gravity;
                entity.rotation += entity.rotation_speed * if slow { 0.5 } else { 1.0 };

                // Missed: silent removal, never a score event
                let missed = if anti_gravity {
                    entity.pos.y < -MISS_MARGIN
                } else {
                    entity.pos.y > h + MISS_MARGIN && entity.vel.y > 0.0
                };
                if missed {
                    entity.sliced = true;
                }
            }
        }

        self.cull();
    }

    fn steer_snitch<R: Rng + ?Sized>(entity: &mut Entity, rng: &mut R, width: f32, height: f32) {
        if entity.age > SNITCH_LINGER {
            entity.vel.y -= SNITCH_ESCAPE_LIFT;
            return;
        }

        entity.vel += Vec2::new(signed_unit(rng), signed_unit(rng)) * SNITCH_JITTER;
        if entity.vel.length() > SNITCH_MAX_SPEED {
            entity.vel *= SNITCH_DAMPING;
        }
        if entity.pos.x < SNITCH_EDGE {
            entity.vel.x += SNITCH_NUDGE;
        }
        if entity.pos.x > width - SNITCH_EDGE {
            entity.vel.x -= SNITCH_NUDGE;
        }
        if entity.pos.y < SNITCH_EDGE {
            entity.vel.y += SNITCH_NUDGE;
        }
        if entity.pos.y > height - SNITCH_EDGE {
            entity.vel.y -= SNITCH_NUDGE;
        }
    }

    /// Drop sliced entities and anything far outside the viewport
    pub fn cull(&mut self) {
        let (w, h) = (self.width, self.height);
        self.entities.retain(|e| {
            let outside = e.pos.y > h + CULL_MARGIN
                || e.pos.y < -CULL_MARGIN
                || e.pos.x < -CULL_MARGIN
                || e.pos.x > w + CULL_MARGIN;
            !(e.sliced || outside)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const W: f32 = 1280.0;
    const H: f32 = 720.0;

    fn setup() -> (EntityManager, Pcg32, Tuning) {
        (EntityManager::new(W, H), Pcg32::seed_from_u64(42), Tuning::default())
    }

    #[test]
    fn test_slice_is_one_way() {
        let mut e = Entity::new(1, EntityKind::Bomb, Vec2::ZERO, Vec2::ZERO);
        assert!(e.slice());
        assert!(!e.slice());
        assert!(e.sliced);
    }

    #[test]
    fn test_spawn_starts_off_screen_and_heads_in() {
        let (mut manager, mut rng, tuning) = setup();
        for _ in 0..200 {
            manager.spawn(&mut rng, &tuning, Difficulty::Medium, 1.0, None, true);
        }
        for e in manager.entities() {
            let below = e.pos.y > H;
            let left = e.pos.x < 0.0;
            let right = e.pos.x > W;
            assert!(below || left || right, "spawned on screen at {:?}", e.pos);
            assert!(e.vel.y < 0.0, "should launch upward");
            if left {
                assert!(e.vel.x > 0.0);
            }
            if right {
                assert!(e.vel.x < 0.0);
            }
        }
    }

    #[test]
    fn test_no_bombs_under_fruit_rain() {
        let (mut manager, mut rng, tuning) = setup();
        for _ in 0..300 {
            manager.spawn(
                &mut rng,
                &tuning,
                Difficulty::Hard,
                5.0,
                Some(EffectKind::FruitRain),
                true,
            );
        }
        assert!(manager.entities().iter().all(|e| !e.is_bomb()));
        // No specials while a modifier is active
        assert!(manager.entities().iter().all(|e| e.effect().is_none()));
    }

    #[test]
    fn test_no_specials_when_gate_closed() {
        let (mut manager, mut rng, tuning) = setup();
        for _ in 0..500 {
            manager.spawn(&mut rng, &tuning, Difficulty::Easy, 1.0, None, false);
        }
        assert!(!manager.has_live_special());
    }

    #[test]
    fn test_specials_appear_when_allowed() {
        let (mut manager, mut rng, tuning) = setup();
        for _ in 0..500 {
            manager.spawn(&mut rng, &tuning, Difficulty::Easy, 1.0, None, true);
        }
        assert!(manager.has_live_special());
    }

    #[test]
    fn test_gravity_pulls_down() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(
            EntityKind::Fruit(FruitKind::Apple),
            Vec2::new(400.0, 400.0),
            Vec2::new(1.0, -5.0),
        );
        manager.update(&mut rng, &tuning, None, Vec2::ZERO);
        let e = manager.get(id).unwrap();
        assert_eq!(e.pos, Vec2::new(401.0, 395.0));
        assert!((e.vel.y - (-5.0 + tuning.gravity)).abs() < 1e-6);
    }

    #[test]
    fn test_freeze_suspends_motion() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(EntityKind::Bomb, Vec2::new(300.0, 300.0), Vec2::new(4.0, -4.0));
        for _ in 0..10 {
            manager.update(&mut rng, &tuning, Some(EffectKind::Freeze), Vec2::ZERO);
        }
        let e = manager.get(id).unwrap();
        assert_eq!(e.pos, Vec2::new(300.0, 300.0));
        assert_eq!(e.vel, Vec2::new(4.0, -4.0));
    }

    #[test]
    fn test_slow_motion_halves_step() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(
            EntityKind::Fruit(FruitKind::Kiwi),
            Vec2::new(300.0, 300.0),
            Vec2::new(4.0, -4.0),
        );
        manager.update(&mut rng, &tuning, Some(EffectKind::SlowMotion), Vec2::ZERO);
        let e = manager.get(id).unwrap();
        assert_eq!(e.pos, Vec2::new(302.0, 298.0));
        assert!((e.vel.y - (-4.0 + tuning.gravity * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_anti_gravity_lifts() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(EntityKind::Bomb, Vec2::new(300.0, 300.0), Vec2::ZERO);
        manager.update(&mut rng, &tuning, Some(EffectKind::AntiGravity), Vec2::ZERO);
        assert!(manager.get(id).unwrap().vel.y < 0.0);
    }

    #[test]
    fn test_anti_gravity_spawns_from_top_or_sides() {
        let (mut manager, mut rng, tuning) = setup();
        for _ in 0..300 {
            manager.spawn(
                &mut rng,
                &tuning,
                Difficulty::Medium,
                1.0,
                Some(EffectKind::AntiGravity),
                true,
            );
        }
        for e in manager.entities() {
            let above = e.pos.y < 0.0;
            let side = e.pos.x < 0.0 || e.pos.x > W;
            assert!(above || side, "spawned at {:?}", e.pos);
            assert!(e.vel.y >= 0.0, "should start heading down, got {:?}", e.vel);
        }
    }

    #[test]
    fn test_anti_gravity_miss_off_top() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(
            EntityKind::Fruit(FruitKind::Orange),
            Vec2::new(300.0, -MISS_MARGIN + 1.0),
            Vec2::new(0.0, -5.0),
        );
        let stays = manager.spawn_at(
            EntityKind::Fruit(FruitKind::Orange),
            Vec2::new(300.0, H + MISS_MARGIN + 50.0),
            Vec2::new(0.0, 5.0),
        );
        manager.update(&mut rng, &tuning, Some(EffectKind::AntiGravity), Vec2::ZERO);
        assert!(manager.get(id).is_none());
        // Falling past the bottom is not a miss while gravity is reversed
        assert!(manager.get(stays).is_some());
    }

    #[test]
    fn test_anti_gravity_drags_snitch_without_gravity() {
        let snitch = EntityKind::Special(EffectKind::GoldenSnitch);
        let start = Vec2::new(640.0, 360.0);
        let tuning = Tuning::default();
        let step = |active: Option<EffectKind>| {
            let mut manager = EntityManager::new(W, H);
            let mut rng = Pcg32::seed_from_u64(9);
            let id = manager.spawn_at(snitch, start, Vec2::new(10.0, 0.0));
            manager.update(&mut rng, &tuning, active, Vec2::ZERO);
            manager.get(id).cloned().unwrap()
        };
        let plain = step(None);
        let floating = step(Some(EffectKind::AntiGravity));

        assert_eq!(floating.vel, plain.vel);
        let dx_plain = plain.pos.x - start.x;
        let dx_floating = floating.pos.x - start.x;
        assert!((dx_floating - dx_plain * ANTI_GRAVITY_DRAG).abs() < 1e-4);
        assert!((floating.pos.y - plain.pos.y).abs() < 1e-4);
    }

    #[test]
    fn test_frenzy_cuts_bombs_and_speeds_launch() {
        let (mut manager, mut rng, tuning) = setup();
        let multiplier = 5.0;
        for _ in 0..2000 {
            manager.spawn(
                &mut rng,
                &tuning,
                Difficulty::Hard,
                multiplier,
                Some(EffectKind::Frenzy),
                true,
            );
        }
        let bombs = manager.entities().iter().filter(|e| e.is_bomb()).count();
        let share = bombs as f32 / manager.entities().len() as f32;
        assert!((share - FRENZY_BOMB_CHANCE).abs() < 0.04, "bomb share {share}");

        let tier = tuning.tier(Difficulty::Hard);
        let slowest = (16.0 + multiplier * 0.5) * tier.speed_mult * FRENZY_SPEED;
        for e in manager.entities().iter().filter(|e| e.pos.y > H) {
            assert!(-e.vel.y >= slowest - 1e-3, "launch too slow: {:?}", e.vel);
        }
    }

    #[test]
    fn test_magnet_pulls_fruit_not_bombs() {
        let (mut manager, mut rng, tuning) = setup();
        let cursor = Vec2::new(500.0, 300.0);
        let fruit = manager.spawn_at(
            EntityKind::Fruit(FruitKind::Grape),
            Vec2::new(400.0, 300.0),
            Vec2::ZERO,
        );
        let bomb = manager.spawn_at(EntityKind::Bomb, Vec2::new(600.0, 300.0), Vec2::ZERO);
        manager.update(&mut rng, &tuning, Some(EffectKind::Magnet), cursor);
        assert!((manager.get(fruit).unwrap().pos.x - 405.0).abs() < 1e-4);
        assert_eq!(manager.get(bomb).unwrap().pos.x, 600.0);
    }

    #[test]
    fn test_falling_off_bottom_is_removed() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(
            EntityKind::Fruit(FruitKind::Apple),
            Vec2::new(300.0, H + MISS_MARGIN - 1.0),
            Vec2::new(0.0, 5.0),
        );
        manager.update(&mut rng, &tuning, None, Vec2::ZERO);
        assert!(manager.get(id).is_none());
    }

    #[test]
    fn test_rising_spawn_below_screen_survives() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(
            EntityKind::Fruit(FruitKind::Apple),
            Vec2::new(300.0, H + 150.0),
            Vec2::new(0.0, -5.0),
        );
        manager.update(&mut rng, &tuning, None, Vec2::ZERO);
        assert!(manager.get(id).is_some());
    }

    #[test]
    fn test_sliced_entities_culled() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(EntityKind::Bomb, Vec2::new(300.0, 300.0), Vec2::ZERO);
        manager.get_mut(id).unwrap().slice();
        manager.update(&mut rng, &tuning, Some(EffectKind::Freeze), Vec2::ZERO);
        assert!(manager.get(id).is_none());
    }

    #[test]
    fn test_bomb_swarm() {
        let (mut manager, mut rng, _) = setup();
        manager.spawn_bomb_swarm(&mut rng);
        assert_eq!(manager.live_count(), SWARM_SIZE);
        assert!(manager.live().all(|e| e.is_bomb() && e.vel.y < 0.0 && e.pos.y > H));
    }

    #[test]
    fn test_snitch_flies_without_gravity() {
        let (mut manager, mut rng, tuning) = setup();
        let id = manager.spawn_at(
            EntityKind::Special(EffectKind::GoldenSnitch),
            Vec2::new(W / 2.0, H / 2.0),
            Vec2::ZERO,
        );
        for _ in 0..20 {
            manager.update(&mut rng, &tuning, None, Vec2::ZERO);
        }
        let snitch = manager.get(id).unwrap();
        assert_eq!(snitch.age, 20);
        assert_eq!(snitch.radius, SNITCH_RADIUS);
        assert_eq!(snitch.score_value, POINTS_SNITCH);
        // Pure jitter: at most 1.5 per axis per frame
        assert!(snitch.vel.x.abs() <= 30.0 && snitch.vel.y.abs() <= 30.0);
    }

    #[test]
    fn test_snitch_eventually_leaves() {
        let (mut manager, mut rng, tuning) = setup();
        manager.spawn_at(
            EntityKind::Special(EffectKind::GoldenSnitch),
            Vec2::new(W / 2.0, H / 2.0),
            Vec2::ZERO,
        );
        for _ in 0..(SNITCH_LINGER + 600) {
            manager.update(&mut rng, &tuning, None, Vec2::ZERO);
        }
        assert_eq!(manager.live_count(), 0);
    }
}
