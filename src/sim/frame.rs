//! Read-only per-frame view for the renderer

use glam::Vec2;
use serde::Serialize;

use super::effects::{ActiveEffect, EffectKind};
use super::entities::{Entity, EntityKind};
use super::particles::{FloatingText, Particle, Splat};
use super::state::{GamePhase, GameState, TrailPoint, TrailStyle};
use crate::mirror_x;

/// Period of the rainbow trail pulse, in frames
const RAINBOW_PULSE: f32 = 9.0;

/// How the blade trail should be drawn this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailLook {
    pub rainbow: bool,
    pub color: Option<&'static str>,
    pub width: f32,
    pub flicker: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub label: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
    /// Remaining fraction, 1 at activation
    pub progress: f32,
}

impl From<ActiveEffect> for EffectView {
    fn from(effect: ActiveEffect) -> Self {
        let info = effect.kind.info();
        Self {
            kind: effect.kind,
            label: info.label,
            emoji: info.emoji,
            color: info.color,
            progress: effect.progress(),
        }
    }
}

/// One live entity as the renderer draws it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub rotation: f32,
    pub radius: f32,
    pub emoji: &'static str,
    pub color: &'static str,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            pos: entity.pos,
            rotation: entity.rotation,
            radius: entity.radius,
            emoji: entity.emoji(),
            color: entity.color(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub frame: u64,
    pub score: i64,
    pub lives: u8,
    pub combo: u32,
    pub cursor: Vec2,
    pub cursor_active: bool,
    pub entities: Vec<EntityView>,
    pub particles: &'a [Particle],
    pub splats: &'a [Splat],
    pub texts: &'a [FloatingText],
    pub trail: &'a [TrailPoint],
    /// Second blade under mirror mode
    pub mirror_trail: Option<Vec<TrailPoint>>,
    pub trail_look: TrailLook,
    pub effect: Option<EffectView>,
    pub disco: bool,
    pub pixelated: bool,
    pub shake: Vec2,
    pub calibration: f32,
}

impl<'a> FrameView<'a> {
    pub fn new(state: &'a GameState) -> Self {
        let active = state.active_kind();
        let mirror_trail = (active == Some(EffectKind::MirrorMode)).then(|| {
            state
                .trail
                .points
                .iter()
                .map(|p| TrailPoint {
                    pos: mirror_x(p.pos, state.width),
                    life: p.life,
                })
                .collect()
        });

        Self {
            phase: state.phase,
            frame: state.frame,
            score: state.score,
            lives: state.lives,
            combo: state.combo.count,
            cursor: state.cursor.pos,
            cursor_active: state.cursor.active,
            entities: state.entities.live().map(EntityView::from).collect(),
            particles: state.particles.particles(),
            splats: state.particles.splats(),
            texts: state.particles.texts(),
            trail: &state.trail.points,
            mirror_trail,
            trail_look: trail_look(state),
            effect: state.effect.map(EffectView::from),
            disco: active == Some(EffectKind::DiscoFever),
            pixelated: active == Some(EffectKind::PixelStorm),
            shake: state.shake.offset,
            calibration: state.calibration.progress,
        }
    }
}

fn trail_look(state: &GameState) -> TrailLook {
    let mut look = TrailLook {
        rainbow: false,
        color: None,
        width: 1.0,
        flicker: false,
    };

    match state.trail.style {
        TrailStyle::Bomb => {
            look.color = Some("#ff0000");
            look.flicker = true;
        }
        TrailStyle::Special(_) => {
            look.rainbow = true;
            look.width = 2.0;
        }
        _ if state.combo.count >= 5 => {
            look.rainbow = true;
            look.width = 1.3 + (state.frame as f32 / RAINBOW_PULSE).sin() * 0.3;
        }
        TrailStyle::Fruit(color) => {
            look.color = Some(color);
            look.width = 1.5;
        }
        TrailStyle::Normal => {}
    }

    if state.active_kind() == Some(EffectKind::ChainReaction) {
        look.width *= 1.5;
        look.rainbow = true;
    }
    look
}
