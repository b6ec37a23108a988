//! Plane geometry helpers for swept-cursor collision

use glam::Vec2;

/// Distance from `point` to the closed segment `a..b`.
///
/// A degenerate segment (a == b) measures the distance to `a`.
pub fn point_to_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = (point - a).dot(ab) / len_sq;
    let closest = if t < 0.0 {
        a
    } else if t > 1.0 {
        b
    } else {
        a + ab * t
    };
    point.distance(closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_interior() {
        let d = point_to_segment_distance(
            Vec2::new(5.0, 3.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_past_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((point_to_segment_distance(Vec2::new(-3.0, 4.0), a, b) - 5.0).abs() < 1e-6);
        assert!((point_to_segment_distance(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Vec2::new(3.0, 4.0);
        assert!((point_to_segment_distance(p, Vec2::ZERO, Vec2::ZERO) - 5.0).abs() < 1e-6);
    }
}
