//! Player preferences
//!
//! Persisted separately from session snapshots in LocalStorage.

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use crate::platform::web;
use crate::sim::Difficulty;

/// Effect density preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle pool size
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 20,
            QualityPreset::Medium => 40,
            QualityPreset::High => 120,
        }
    }
}

/// Preferences that survive between visits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Tier used when a run starts
    pub difficulty: Difficulty,

    /// Camera shake on bomb hits
    pub screen_shake: bool,
    /// Blade trail
    pub trails: bool,
    /// Juice, sparks and sparkles
    pub particles: bool,
    /// Overrides `screen_shake`
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            difficulty: Difficulty::Medium,
            screen_shake: true,
            trails: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Particle cap; zero when particles are switched off
    pub fn max_particles(&self) -> usize {
        if self.particles { self.quality.max_particles() } else { 0 }
    }

    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sliceMasterSettings";

    /// Stored preferences, or defaults when nothing usable is stored
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(json) = web::read_item(Self::STORAGE_KEY) else {
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Discarding stored preferences: {}", e);
            Self::default()
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let stored = serde_json::to_string(self)
            .map(|json| web::write_item(Self::STORAGE_KEY, &json))
            .unwrap_or(false);
        if !stored {
            log::warn!("Preferences not saved");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_caps() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 20);
        assert_eq!(Settings::default().max_particles(), 40);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_particles(), 120);
        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"quality":"High"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.screen_shake);
        assert_eq!(settings.difficulty, Difficulty::Medium);
    }
}
