//! Swept-cursor hit detection
//!
//! The cursor moves in discrete jumps between frames, so a plain point test
//! would let fast swipes pass straight through fruit. Each frame the cursor's
//! path is treated as a segment and tested against every live entity.

use glam::Vec2;

use super::entities::Entity;
use super::geometry::point_to_segment_distance;

/// Whether the segment `p1..p2`, thickened by `hitbox`, touches `entity`
#[inline]
pub fn segment_hits_entity(entity: &Entity, p1: Vec2, p2: Vec2, hitbox: f32) -> bool {
    let reach = entity.radius + hitbox;
    let swept = point_to_segment_distance(entity.pos, p1, p2);
    let tip = entity.pos.distance(p2);
    swept.min(tip) < reach
}

/// Ids of unsliced entities touched by the segment, in storage order
pub fn segment_hits(entities: &[Entity], p1: Vec2, p2: Vec2, hitbox: f32) -> Vec<u32> {
    entities
        .iter()
        .filter(|e| !e.sliced && segment_hits_entity(e, p1, p2, hitbox))
        .map(|e| e.id)
        .collect()
}

/// Unsliced non-bomb entities within `radius` of `center`, excluding `origin`
pub fn neighbors_within(entities: &[Entity], origin: u32, center: Vec2, radius: f32) -> Vec<u32> {
    entities
        .iter()
        .filter(|e| e.id != origin && !e.sliced && !e.is_bomb())
        .filter(|e| e.pos.distance(center) < radius)
        .map(|e| e.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{EntityKind, FruitKind};

    fn fruit(id: u32, x: f32, y: f32) -> Entity {
        Entity::new(id, EntityKind::Fruit(FruitKind::Apple), Vec2::new(x, y), Vec2::ZERO)
    }

    #[test]
    fn test_fast_swipe_does_not_tunnel() {
        // Fruit sits midway along a long jump
        let entities = vec![fruit(1, 500.0, 300.0)];
        let hits = segment_hits(&entities, Vec2::new(0.0, 300.0), Vec2::new(1000.0, 300.0), 10.0);
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn test_reach_is_radius_plus_hitbox() {
        let e = fruit(1, 0.0, 0.0);
        let hitbox = 80.0;
        let just_inside = Vec2::new(e.radius + hitbox - 1.0, 0.0);
        let just_outside = Vec2::new(e.radius + hitbox + 1.0, 0.0);
        assert!(segment_hits_entity(&e, just_inside, just_inside, hitbox));
        assert!(!segment_hits_entity(&e, just_outside, just_outside, hitbox));
    }

    #[test]
    fn test_sliced_entities_ignored() {
        let mut entities = vec![fruit(1, 100.0, 100.0), fruit(2, 120.0, 100.0)];
        entities[0].sliced = true;
        let hits = segment_hits(&entities, Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0), 10.0);
        assert_eq!(hits, vec![2]);
    }

    #[test]
    fn test_neighbors_skip_bombs_and_origin() {
        let mut entities = vec![fruit(1, 0.0, 0.0), fruit(2, 100.0, 0.0), fruit(3, 1000.0, 0.0)];
        entities.push(Entity::new(4, EntityKind::Bomb, Vec2::new(50.0, 0.0), Vec2::ZERO));
        let found = neighbors_within(&entities, 1, Vec2::ZERO, 300.0);
        assert_eq!(found, vec![2]);
    }
}
