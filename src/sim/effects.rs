//! Power-up modifiers
//!
//! Slicing a special entity activates its modifier. Instant modifiers apply
//! once; timed modifiers occupy the single active-effect slot until their
//! timer runs out.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Every modifier a special entity can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Invincibility,
    FruitRain,
    GiantCursor,
    TinyCursor,
    MirrorMode,
    BombTrap,
    HighStakes,
    ExtraLife,
    Magnet,
    SlowMotion,
    Blast,
    Freeze,
    Frenzy,
    BonusPoints,
    ChainReaction,
    AntiGravity,
    DiscoFever,
    GoldenSnitch,
    GhostMode,
    PixelStorm,
}

/// Static description of a modifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectInfo {
    pub emoji: &'static str,
    pub color: &'static str,
    pub label: &'static str,
    /// Relative weight in the special-spawn draw
    pub weight: u32,
    /// Active duration in frames; 0 marks an instant modifier
    pub duration: u32,
}

impl EffectKind {
    pub const ALL: [EffectKind; 20] = [
        EffectKind::Invincibility,
        EffectKind::FruitRain,
        EffectKind::GiantCursor,
        EffectKind::TinyCursor,
        EffectKind::MirrorMode,
        EffectKind::BombTrap,
        EffectKind::HighStakes,
        EffectKind::ExtraLife,
        EffectKind::Magnet,
        EffectKind::SlowMotion,
        EffectKind::Blast,
        EffectKind::Freeze,
        EffectKind::Frenzy,
        EffectKind::BonusPoints,
        EffectKind::ChainReaction,
        EffectKind::AntiGravity,
        EffectKind::DiscoFever,
        EffectKind::GoldenSnitch,
        EffectKind::GhostMode,
        EffectKind::PixelStorm,
    ];

    pub fn info(self) -> EffectInfo {
        let (emoji, color, label, weight, duration) = match self {
            EffectKind::Invincibility => ("🌟", "#FFFF00", "Invincibility", 10, 600),
            EffectKind::FruitRain => ("🌧️", "#00BFFF", "Fruit Rain", 10, 300),
            EffectKind::GiantCursor => ("🍄", "#FF0000", "Giant Cursor", 10, 600),
            EffectKind::TinyCursor => ("🦐", "#FFC0CB", "Tiny Cursor", 8, 600),
            EffectKind::MirrorMode => ("🪞", "#C0C0C0", "Mirror Mode", 8, 600),
            EffectKind::BombTrap => ("💀", "#000000", "Bomb Trap", 5, 0),
            EffectKind::HighStakes => ("💎", "#00FFFF", "High Stakes", 8, 600),
            EffectKind::ExtraLife => ("💖", "#FF1493", "Extra Life", 5, 0),
            EffectKind::Magnet => ("🧲", "#FF4500", "Magnet", 10, 600),
            EffectKind::SlowMotion => ("🐌", "#ADFF2F", "Slow Motion", 10, 600),
            EffectKind::Blast => ("🧨", "#FF6347", "Blast", 5, 0),
            EffectKind::Freeze => ("❄️", "#E0FFFF", "Freeze", 8, 600),
            EffectKind::Frenzy => ("⚡", "#FFD700", "Frenzy", 8, 600),
            EffectKind::BonusPoints => ("🪙", "#DAA520", "Bonus Points", 8, 0),
            EffectKind::ChainReaction => ("🔗", "#00FF7F", "Chain Reaction", 10, 600),
            EffectKind::AntiGravity => ("🎈", "#FF00FF", "Anti-Gravity", 10, 600),
            EffectKind::DiscoFever => ("💃", "#9400D3", "Disco Fever", 8, 600),
            EffectKind::GoldenSnitch => ("🐝", "#FFD700", "Golden Snitch", 5, 0),
            EffectKind::GhostMode => ("👻", "#F8F8FF", "Ghost Mode", 8, 600),
            EffectKind::PixelStorm => ("👾", "#32CD32", "Pixel Storm", 8, 600),
        };
        EffectInfo {
            emoji,
            color,
            label,
            weight,
            duration,
        }
    }

    /// Instant modifiers never occupy the active slot
    pub fn is_instant(self) -> bool {
        self.info().duration == 0
    }

    /// Hitbox scale while this modifier is active
    pub fn hitbox_scale(self) -> f32 {
        match self {
            EffectKind::GiantCursor => 2.5,
            EffectKind::TinyCursor => 0.4,
            _ => 1.0,
        }
    }

    /// Whether spawns under this modifier are forced to be non-bombs
    pub fn suppresses_bombs(self) -> bool {
        matches!(self, EffectKind::FruitRain | EffectKind::DiscoFever)
    }

    /// Draw a modifier using the weight table
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> EffectKind {
        Self::ALL
            .choose_weighted(rng, |kind| kind.info().weight)
            .copied()
            .unwrap_or(EffectKind::BonusPoints)
    }
}

/// The occupant of the single timed-effect slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    /// Frames remaining
    pub timer: u32,
    /// Total frames, for progress display
    pub duration: u32,
}

impl ActiveEffect {
    /// Start a timed modifier. Returns `None` for instant kinds.
    pub fn start(kind: EffectKind) -> Option<Self> {
        let duration = kind.info().duration;
        (duration > 0).then_some(Self {
            kind,
            timer: duration,
            duration,
        })
    }

    /// Count down one frame. Returns true when the effect has just expired.
    pub fn tick(&mut self) -> bool {
        self.timer = self.timer.saturating_sub(1);
        self.timer == 0
    }

    /// Remaining fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            0.0
        } else {
            self.timer as f32 / self.duration as f32
        }
    }
}
