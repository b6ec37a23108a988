//! Session snapshots
//!
//! Features:
//! - Versioned JSON envelope around the full [`GameState`]
//! - Gameplay RNG included, so a restored session replays identically
//! - Cosmetic state rebuilt empty on restore
//! - LocalStorage slot on wasm32, plain files natively

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
#[cfg(target_arch = "wasm32")]
use crate::platform::web;
use crate::sim::GameState;

/// Bumped whenever the serialized shape of `GameState` changes
pub const SNAPSHOT_VERSION: u32 = 1;

/// LocalStorage key for the saved session (used only in wasm32)
#[allow(dead_code)]
const STORAGE_KEY: &str = "sliceMasterSession";

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    state: GameState,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

/// Encode a session as a versioned JSON envelope
pub fn save_session(state: &GameState) -> Result<String> {
    let json = serde_json::to_string(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        state,
    })?;
    log::debug!("Session snapshot at frame {} ({} bytes)", state.frame, json.len());
    Ok(json)
}

/// Decode a session envelope. The version is checked before the state is
/// parsed so an incompatible save reports the mismatch, not a field error.
pub fn restore_session(json: &str) -> Result<GameState> {
    let header: VersionHeader = serde_json::from_str(json)?;
    if header.version != SNAPSHOT_VERSION {
        return Err(Error::UnsupportedVersion {
            found: header.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    let Snapshot { state: mut restored, .. } = serde_json::from_str(json)?;
    restored.reseed_cosmetics();
    log::info!(
        "Restored session at frame {} ({}, score {})",
        restored.frame,
        restored.phase.as_str(),
        restored.score
    );
    Ok(restored)
}

pub fn save_session_to(state: &GameState, path: &Path) -> Result<()> {
    fs::write(path, save_session(state)?)?;
    Ok(())
}

pub fn restore_session_from(path: &Path) -> Result<GameState> {
    restore_session(&fs::read_to_string(path)?)
}

/// Store the session in LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn store_session(state: &GameState) {
    let json = match save_session(state) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to encode session: {}", e);
            return;
        }
    };
    if !web::write_item(STORAGE_KEY, &json) {
        log::warn!("Failed to store session");
    }
}

/// Load the stored session, if any (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load_stored_session() -> Option<GameState> {
    let json = web::read_item(STORAGE_KEY)?;
    match restore_session(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("Discarding stored session: {}", e);
            None
        }
    }
}
