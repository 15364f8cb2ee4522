//! Ground probe adapter
//!
//! Every limb probes along its bind direction, rotated by the current body
//! orientation, from the hip's current position for exactly its length.

use glam::Vec2;

use crate::limb::Limb;
use crate::traits::SceneQuery;
use crate::types::CollisionLayers;

/// A single probe ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRay {
    pub origin: Vec2,
    pub direction: Vec2,
    pub max_distance: f32,
}

impl ProbeRay {
    /// The ray a limb casts from `hip` while the body is rotated by `rotation`
    pub fn for_limb(limb: &Limb, hip: Vec2, rotation: f32) -> Self {
        Self {
            origin: hip,
            direction: limb.world_direction(rotation),
            max_distance: limb.length(),
        }
    }

    /// Point along the ray at `distance` from the origin
    pub fn point_at(&self, distance: f32) -> Vec2 {
        self.origin + self.direction * distance
    }

    /// Query the scene. Pure, no side effects.
    pub fn cast(&self, scene: &impl SceneQuery, layers: CollisionLayers) -> Option<Vec2> {
        scene.raycast(self.origin, self.direction, self.max_distance, layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LegConfig;
    use crate::types::{BoneId, LimbId, SolverHandle};

    struct Floor(f32);

    impl SceneQuery for Floor {
        fn raycast(&self, origin: Vec2, direction: Vec2, max: f32, _: CollisionLayers) -> Option<Vec2> {
            if direction.y >= 0.0 {
                return None;
            }
            let t = (self.0 - origin.y) / direction.y;
            (0.0..=max).contains(&t).then(|| origin + direction * t)
        }

        fn segment_hits_wall(&self, a: Vec2, b: Vec2, _: CollisionLayers) -> bool {
            a.y.min(b.y) < self.0
        }
    }

    fn limb() -> Limb {
        let bones: Vec<BoneId> = (0..3).map(BoneId::from_raw).collect();
        Limb::new(
            LimbId::new(0),
            &bones,
            &[Vec2::ZERO, Vec2::new(0.0, -1.0), Vec2::new(0.0, -2.0)],
            0.0,
            SolverHandle::from_raw(0),
            &LegConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_probe_hits_floor_in_reach() {
        let ray = ProbeRay::for_limb(&limb(), Vec2::new(3.0, 1.5), 0.0);
        assert_eq!(ray.max_distance, 2.0);
        let hit = ray.cast(&Floor(0.0), CollisionLayers::GROUND);
        assert_eq!(hit, Some(Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_probe_misses_floor_out_of_reach() {
        let ray = ProbeRay::for_limb(&limb(), Vec2::new(0.0, 2.5), 0.0);
        assert_eq!(ray.cast(&Floor(0.0), CollisionLayers::GROUND), None);
    }

    #[test]
    fn test_probe_follows_body_rotation() {
        // Upside down: the leg points at the sky
        let ray = ProbeRay::for_limb(&limb(), Vec2::new(0.0, 1.0), std::f32::consts::PI);
        assert!(ray.direction.y > 0.99);
        assert_eq!(ray.cast(&Floor(0.0), CollisionLayers::GROUND), None);
    }
}
