//! Face-tracker input mapping

use glam::Vec2;

/// Horizontal amplification of head movement
pub const SENSITIVITY_X: f32 = 2.5;
/// Vertical amplification of head movement
pub const SENSITIVITY_Y: f32 = 2.0;

/// Map a normalized nose landmark (camera space, 0..1 on both axes) to a
/// viewport cursor target.
///
/// The camera image is mirrored so moving the head right moves the cursor
/// right. Natural head motion only covers the middle of the frame, so the
/// offset from center is amplified and the result clamped to the viewport.
pub fn nose_to_viewport(landmark: Vec2, width: f32, height: f32) -> Vec2 {
    let centered = Vec2::new((1.0 - landmark.x) - 0.5, landmark.y - 0.5);
    let amplified = centered * Vec2::new(SENSITIVITY_X, SENSITIVITY_Y);
    let unit = (amplified + Vec2::splat(0.5)).clamp(Vec2::ZERO, Vec2::ONE);
    unit * Vec2::new(width, height)
}
