//! Best-score record
//!
//! A single scalar, persisted to LocalStorage in the browser and to a JSON
//! file natively.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
#[cfg(target_arch = "wasm32")]
use crate::platform::web;

/// Best score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sliceMasterHighScore";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run's score. Returns true if it is a new best.
    ///
    /// Negative session totals never count.
    pub fn submit(&mut self, score: i64) -> bool {
        let Ok(score) = u64::try_from(score) else {
            return false;
        };
        if score > self.best {
            log::info!("New high score {} (was {})", score, self.best);
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from a JSON file; a missing file yields an empty record
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Best score kept by the browser. The stored value is a bare number.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(raw) = web::read_item(Self::STORAGE_KEY) else {
            return Self::new();
        };
        match raw.trim().parse::<u64>() {
            Ok(best) => Self { best },
            Err(_) => {
                log::warn!("Ignoring unreadable high score {:?}", raw);
                Self::new()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if !web::write_item(Self::STORAGE_KEY, &self.best.to_string()) {
            log::warn!("High score {} not saved", self.best);
        }
    }

    /// Browser storage only; native callers use `load_from`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_tracks_best() {
        let mut hs = HighScore::new();
        assert!(hs.submit(30));
        assert!(!hs.submit(30));
        assert!(!hs.submit(12));
        assert!(hs.submit(31));
        assert_eq!(hs.best, 31);
    }

    #[test]
    fn test_negative_score_ignored() {
        let mut hs = HighScore::new();
        assert!(!hs.submit(-6));
        assert_eq!(hs.best, 0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("nose-slicer-hs-{}.json", std::process::id()));
        let hs = HighScore { best: 4242 };
        hs.save_to(&path).unwrap();
        assert_eq!(HighScore::load_from(&path).unwrap(), hs);
        fs::remove_file(&path).unwrap();
        assert_eq!(HighScore::load_from(&path).unwrap(), HighScore::new());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path =
            std::env::temp_dir().join(format!("nose-slicer-bad-{}.json", std::process::id()));
        fs::write(&path, "not json").unwrap();
        assert!(matches!(HighScore::load_from(&path), Err(crate::Error::Json(_))));
        fs::remove_file(&path).unwrap();
    }
}
