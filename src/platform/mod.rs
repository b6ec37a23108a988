//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Tracker input (nose landmark to viewport pixels)
//! - Host binding and callbacks (wasm32 only)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::nose_to_viewport;
