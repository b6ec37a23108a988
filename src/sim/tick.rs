//! Frame-stepped game engine
//!
//! [`GameEngine`] owns a [`GameState`] plus the host's callback table and
//! advances everything by one display frame per [`GameEngine::tick`]. Cursor
//! samples may arrive between ticks through [`GameEngine::update_cursor`];
//! they are applied atomically and never interleave with a frame's own work.

use glam::Vec2;

use super::callbacks::GameCallbacks;
use super::collision::{neighbors_within, segment_hits};
use super::difficulty::Difficulty;
use super::effects::{ActiveEffect, EffectKind};
use super::entities::{Entity, EntityKind};
use super::frame::FrameView;
use super::schedule::DeferredEvent;
use super::state::{Cursor, GamePhase, GameState, TrailStyle};
use crate::mirror_x;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Calibration progress per frame while tracked / while lost
const CALIBRATION_GAIN: f32 = 0.015;
const CALIBRATION_LOSS: f32 = 0.02;
/// Cursor jump that throws sparkles
const SPARKLE_DISTANCE: f32 = 10.0;
const BLAST_POINTS_EACH: i64 = 5;
const BONUS_POINTS: i64 = 50;

const COMBO_COLOR: &str = "#ffd700";

/// One cursor sample from the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorSample {
    /// Target position in viewport pixels
    Tracked(Vec2),
    /// Tracker lost the player this frame
    Lost,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied before the frame's own work
    pub cursor: Option<CursorSample>,
}

impl TickInput {
    pub fn tracked(x: f32, y: f32) -> Self {
        Self {
            cursor: Some(CursorSample::Tracked(Vec2::new(x, y))),
        }
    }

    pub fn lost() -> Self {
        Self {
            cursor: Some(CursorSample::Lost),
        }
    }
}

/// What one slice resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOutcome {
    /// Entity missing or already sliced
    Ignored,
    /// Fruit or special, counts toward the combo
    Hit,
    /// Bomb that Invincibility absorbed; still counts toward the combo
    Blocked,
    /// Bomb that cost lives
    Damage,
}

/// The gameplay orchestrator
pub struct GameEngine<C: GameCallbacks> {
    state: GameState,
    callbacks: C,
    shake_enabled: bool,
    trails_enabled: bool,
}

impl<C: GameCallbacks> GameEngine<C> {
    pub fn new(seed: u64, width: f32, height: f32, callbacks: C) -> Self {
        Self::with_tuning(seed, width, height, Tuning::default(), callbacks)
    }

    pub fn with_tuning(seed: u64, width: f32, height: f32, tuning: Tuning, callbacks: C) -> Self {
        Self::from_state(GameState::new(seed, width, height, tuning), callbacks)
    }

    /// Resume from a restored state
    pub fn from_state(state: GameState, callbacks: C) -> Self {
        Self {
            state,
            callbacks,
            shake_enabled: true,
            trails_enabled: true,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tools and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    pub fn into_parts(self) -> (GameState, C) {
        (self.state, self.callbacks)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn combo(&self) -> u32 {
        self.state.combo.count
    }

    pub fn frame(&self) -> FrameView<'_> {
        FrameView::new(&self.state)
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.state.particles.set_max_particles(settings.max_particles());
        self.shake_enabled = settings.effective_screen_shake();
        self.trails_enabled = settings.trails;
        if self.state.phase != GamePhase::Playing {
            self.state.difficulty = settings.difficulty;
        }
    }

    /// Change tier. Ignored mid-run.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.state.phase == GamePhase::Playing {
            log::warn!("Ignoring difficulty change to {} during play", difficulty.as_str());
            return;
        }
        self.state.difficulty = difficulty;
        log::info!("Difficulty set to {}", difficulty.as_str());
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let state = &mut self.state;
        state.width = width;
        state.height = height;
        state.entities.resize(width, height);
        let max = Vec2::new(width, height);
        state.cursor.pos = state.cursor.pos.clamp(Vec2::ZERO, max);
        state.cursor.prev = state.cursor.prev.clamp(Vec2::ZERO, max);
    }

    /// Enter a phase. Every transition starts a new epoch, dropping any
    /// deferred events from the previous one.
    pub fn set_phase(&mut self, phase: GamePhase) {
        log::info!("Phase {} -> {}", self.state.phase.as_str(), phase.as_str());
        let state = &mut self.state;
        state.phase = phase;
        state.epoch = state.epoch.wrapping_add(1);
        state.schedule.clear();
        state.game_over_pending = false;

        match phase {
            GamePhase::Calibration => {
                let active = state.cursor.active;
                state.cursor = Cursor {
                    active,
                    ..Cursor::centered(state.width, state.height)
                };
                state.calibration = Default::default();
                state.lives = state.tuning.starting_lives;
                self.callbacks.on_lives_update(state.lives);
                self.reset_effects();
            }
            GamePhase::Playing => {
                state.entities.clear();
                state.particles.clear();
                state.trail.clear();
                state.scheduler.reset();
                state.combo.reset();
                state.score = 0;
                state.lives = state.tuning.starting_lives;
                self.callbacks.on_lives_update(state.lives);
                self.reset_effects();
            }
            GamePhase::Menu | GamePhase::GameOver => {}
        }
    }

    fn reset_effects(&mut self) {
        self.state.effect = None;
        self.state.special_cooldown = 0;
        self.state.trail.flash(TrailStyle::Normal);
        self.callbacks.on_effect_change(None);
    }

    /// Apply a tracked cursor sample: smooth, clamp, emit, and slice along
    /// the path travelled
    pub fn update_cursor(&mut self, target: Vec2) {
        let state = &mut self.state;
        let prev = state.cursor.pos;
        let delta = target - prev;
        let max = Vec2::new(state.width, state.height);
        let pos = (prev + delta * state.tuning.cursor_smoothing).clamp(Vec2::ZERO, max);
        state.cursor.prev = prev;
        state.cursor.pos = pos;
        self.callbacks.on_cursor_move(pos);

        if delta.length() > SPARKLE_DISTANCE {
            state.particles.spawn_sparkles(pos);
        }
        if self.trails_enabled {
            state.trail.push(pos, state.tuning.blade_life);
        }

        if state.phase == GamePhase::Playing {
            self.sweep(prev, pos);
            if self.state.active_kind() == Some(EffectKind::MirrorMode) {
                let width = self.state.width;
                self.sweep(mirror_x(prev, width), mirror_x(pos, width));
            }
        }

        if !self.state.cursor.active {
            self.state.cursor.active = true;
            self.callbacks.on_cursor_active(true);
        }
    }

    /// Tracker lost the player
    pub fn cursor_lost(&mut self) {
        if self.state.cursor.active {
            self.state.cursor.active = false;
            self.callbacks.on_cursor_active(false);
        }
    }

    /// Slice everything the segment touches and update the combo
    fn sweep(&mut self, p1: Vec2, p2: Vec2) {
        let hitbox = self.state.hitbox_radius();
        let ids = segment_hits(self.state.entities.entities(), p1, p2, hitbox);

        let mut scored = false;
        let mut damaged = false;
        for id in ids {
            match self.slice_entity(id) {
                SliceOutcome::Hit | SliceOutcome::Blocked => scored = true,
                SliceOutcome::Damage => damaged = true,
                SliceOutcome::Ignored => {}
            }
        }

        // A bomb in the pass ends the streak outright
        if scored && !damaged {
            let state = &mut self.state;
            state.combo.hit(state.tuning.combo_timer_max);
            if state.combo.count > 1 {
                let text = format!("{} Combo", state.combo.count);
                state.particles.create_floating_text(p2, text, COMBO_COLOR);
            }
        }
    }

    /// Resolve a slice of one entity. A second call on the same entity is a
    /// no-op.
    pub fn slice_entity(&mut self, id: u32) -> SliceOutcome {
        let Some(entity) = self.state.entities.get_mut(id) else {
            return SliceOutcome::Ignored;
        };
        if !entity.slice() {
            return SliceOutcome::Ignored;
        }
        let entity = entity.clone();
        log::debug!("Sliced {:?} #{}", entity.kind, entity.id);

        self.state
            .particles
            .create_explosion(entity.pos, entity.color(), entity.is_bomb());

        match entity.kind {
            EntityKind::Special(kind) => {
                self.activate_effect(kind);
                let info = kind.info();
                self.state
                    .particles
                    .create_floating_text(entity.pos, info.label, "#ffffff");
                self.state.trail.flash(TrailStyle::Special(entity.color()));
                self.add_score(entity.score_value);
                SliceOutcome::Hit
            }
            EntityKind::Bomb => self.bomb_hit(&entity),
            EntityKind::Fruit(_) => {
                self.fruit_hit(&entity);
                SliceOutcome::Hit
            }
        }
    }

    fn bomb_hit(&mut self, bomb: &Entity) -> SliceOutcome {
        let active = self.state.active_kind();
        if active == Some(EffectKind::Invincibility) {
            self.state
                .particles
                .create_floating_text(bomb.pos, "Blocked", "#ffff00");
            return SliceOutcome::Blocked;
        }

        let state = &mut self.state;
        if self.shake_enabled {
            state.shake.trigger();
        }
        state.combo.reset();
        state.trail.flash(TrailStyle::Bomb);
        self.callbacks.on_damage();

        let damage = if active == Some(EffectKind::HighStakes) { 2 } else { 1 };
        state.lives = state.lives.saturating_sub(damage);
        self.callbacks.on_lives_update(state.lives);
        log::info!("Bomb hit, {} lives left", state.lives);

        if state.lives == 0 && !state.game_over_pending {
            state.game_over_pending = true;
            let due = state.frame + u64::from(state.tuning.game_over_delay);
            state.schedule.push(due, state.epoch, DeferredEvent::GameOver);
        }
        SliceOutcome::Damage
    }

    fn fruit_hit(&mut self, fruit: &Entity) {
        let active = self.state.active_kind();
        let mut points = fruit.score_value;
        if self.state.combo.count > 3 {
            points *= 2;
        }
        if active == Some(EffectKind::HighStakes) {
            points *= 2;
        }
        if active == Some(EffectKind::DiscoFever) {
            points *= 3;
        }
        self.add_score(points);

        let state = &mut self.state;
        state.particles.create_splat(fruit.pos, fruit.color());
        state.trail.flash(TrailStyle::Fruit(fruit.color()));

        if active == Some(EffectKind::ChainReaction) {
            let neighbors = neighbors_within(
                state.entities.entities(),
                fruit.id,
                fruit.pos,
                state.tuning.chain_radius,
            );
            let due = state.frame + u64::from(state.tuning.chain_delay);
            for id in neighbors {
                if let Some(neighbor) = state.entities.get(id) {
                    let mid = (fruit.pos + neighbor.pos) / 2.0;
                    state.particles.spawn_sparkles(mid);
                }
                state.schedule.push(due, state.epoch, DeferredEvent::ChainSlice { id });
            }
        }
    }

    fn add_score(&mut self, delta: i64) {
        self.state.score += delta;
        self.callbacks.on_score_update(delta);
    }

    /// Apply a modifier. Instant kinds resolve now and start the special
    /// cooldown; timed kinds take the slot only if it is free.
    pub fn activate_effect(&mut self, kind: EffectKind) {
        let state = &mut self.state;
        let center = Vec2::new(state.width / 2.0, state.height / 2.0);

        if kind.is_instant() {
            match kind {
                EffectKind::ExtraLife => {
                    state.lives = state.lives.saturating_add(1).min(state.tuning.max_lives);
                    self.callbacks.on_lives_update(state.lives);
                    state.particles.create_floating_text(center, "Extra Life!", "#ff0088");
                }
                EffectKind::BombTrap => {
                    state.entities.spawn_bomb_swarm(&mut state.rng);
                    state.particles.create_floating_text(center, "It's a Trap!", "#000000");
                }
                EffectKind::Blast => {
                    // Cleared directly: no per-entity scoring or damage
                    let targets: Vec<(u32, Vec2, &'static str, bool)> = state
                        .entities
                        .live()
                        .filter(|e| e.effect().is_none())
                        .map(|e| (e.id, e.pos, e.color(), e.is_bomb()))
                        .collect();
                    for &(id, pos, color, is_bomb) in &targets {
                        if let Some(e) = state.entities.get_mut(id) {
                            e.slice();
                        }
                        state.particles.create_explosion(pos, color, is_bomb);
                    }
                    state.particles.create_floating_text(center, "Blast!", "#FF6347");
                    self.add_score(targets.len() as i64 * BLAST_POINTS_EACH);
                }
                EffectKind::BonusPoints => {
                    state.particles.create_floating_text(center, "Bonus Points!", "#FFD700");
                    self.add_score(BONUS_POINTS);
                }
                EffectKind::GoldenSnitch => {
                    state.particles.create_floating_text(center, "Caught It!", "#FFD700");
                }
                _ => {}
            }
            self.state.special_cooldown = self.state.tuning.special_cooldown;
            log::info!("Instant effect {}", kind.info().label);
            return;
        }

        if let Some(current) = state.effect {
            log::debug!(
                "Slot busy with {}, dropping {}",
                current.kind.info().label,
                kind.info().label
            );
            return;
        }
        state.effect = ActiveEffect::start(kind);
        log::info!("Effect {} active for {} frames", kind.info().label, kind.info().duration);
        self.callbacks.on_effect_change(state.effect);
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput) {
        self.state.frame += 1;

        match input.cursor {
            Some(CursorSample::Tracked(target)) => self.update_cursor(target),
            Some(CursorSample::Lost) => self.cursor_lost(),
            None => {}
        }

        let state = &mut self.state;
        let jitter = if state.shake.duration > 0 {
            state.particles.jitter(1.0)
        } else {
            Vec2::ZERO
        };
        state.shake.step(jitter);

        if state.phase == GamePhase::Calibration {
            self.step_calibration();
        }

        if self.state.phase == GamePhase::Playing {
            self.step_effect();
            self.step_spawns();
            let state = &mut self.state;
            state.combo.decay();
            let active = state.active_kind();
            state
                .entities
                .update(&mut state.rng, &state.tuning, active, state.cursor.pos);
        }

        self.state.particles.update();
        self.state.trail.decay();
        self.fire_due_events();
    }

    fn step_calibration(&mut self) {
        let state = &mut self.state;
        let calibration = &mut state.calibration;
        if state.cursor.active {
            calibration.progress = (calibration.progress + CALIBRATION_GAIN).min(1.0);
            if calibration.progress >= 1.0 && !calibration.completed {
                calibration.completed = true;
                log::info!("Calibration complete");
                self.callbacks.on_calibration_complete();
            }
        } else {
            calibration.progress = (calibration.progress - CALIBRATION_LOSS).max(0.0);
        }
        self.callbacks.on_calibration_progress(calibration.progress);
    }

    /// Count down the slot, or the cooldown when the slot is empty
    fn step_effect(&mut self) {
        let state = &mut self.state;
        let expired = match state.effect.as_mut() {
            Some(effect) => effect.tick(),
            None => {
                state.special_cooldown = state.special_cooldown.saturating_sub(1);
                false
            }
        };
        if expired {
            if let Some(effect) = state.effect.take() {
                log::info!("Effect {} expired", effect.kind.info().label);
            }
            state.special_cooldown = state.tuning.special_cooldown;
            self.callbacks.on_effect_change(None);
        }
    }

    fn step_spawns(&mut self) {
        let state = &mut self.state;
        let active = state.active_kind();
        let tier = *state.tuning.tier(state.difficulty);
        let Some(wave) = state
            .scheduler
            .tick(&mut state.rng, &tier, &state.tuning, active)
        else {
            return;
        };

        for _ in 0..wave.count {
            let allowed = state.special_allowed();
            state.entities.spawn(
                &mut state.rng,
                &state.tuning,
                state.difficulty,
                wave.multiplier,
                active,
                allowed,
            );
        }
    }

    fn fire_due_events(&mut self) {
        let events = self
            .state
            .schedule
            .drain_due(self.state.frame, self.state.epoch);
        for event in events {
            match event {
                DeferredEvent::GameOver => {
                    self.state.game_over_pending = false;
                    log::info!("Game over with score {}", self.state.score);
                    self.state.phase = GamePhase::GameOver;
                    self.callbacks.on_game_over();
                }
                DeferredEvent::ChainSlice { id } => {
                    if self.state.phase == GamePhase::Playing {
                        self.slice_entity(id);
                    }
                }
            }
        }
    }
}
