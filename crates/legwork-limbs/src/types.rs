//! Common types shared by the placement core and its collaborators.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier of a bone inside a [`Skeleton`](crate::skeleton::Skeleton).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoneId(pub(crate) u32);

impl BoneId {
    /// Create a bone id from a raw index (for external skeletons)
    pub fn from_raw(raw: u32) -> Self {
        BoneId(raw)
    }

    /// Get the raw index
    pub fn raw(&self) -> u32 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for BoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bone({})", self.0)
    }
}

/// Identifier of a limb. Doubles as its slot in the circular neighbor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LimbId(pub(crate) usize);

impl LimbId {
    /// Create a limb id from its build-order index
    pub fn new(index: usize) -> Self {
        LimbId(index)
    }

    /// Build-order index of this limb
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for LimbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Limb({})", self.0)
    }
}

/// Handle to the per-limb IK solver (and the target it drives).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolverHandle(pub(crate) usize);

impl SolverHandle {
    /// Create a handle from a raw solver index (for external solvers)
    pub fn from_raw(raw: usize) -> Self {
        SolverHandle(raw)
    }

    /// Get the raw solver index
    pub fn raw(&self) -> usize {
        self.0
    }
}

bitflags! {
    /// Collision layers a query is allowed to hit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CollisionLayers: u32 {
        /// Walkable terrain
        const GROUND = 1 << 0;
        /// Walls and ceilings
        const WALL = 1 << 1;
        /// Props that legs may stand on but knees ignore
        const PROP = 1 << 2;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        CollisionLayers::GROUND | CollisionLayers::WALL
    }
}

/// Time step handed to the engine by the driving loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds elapsed since the previous tick
    pub delta_time: f32,
    /// Seconds since the driver started
    pub now: f32,
}

impl FrameTime {
    pub fn new(delta_time: f32, now: f32) -> Self {
        Self { delta_time, now }
    }
}

/// World-space pose of the creature body.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyPose {
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise
    pub rotation: f32,
}

impl BodyPose {
    pub fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layers() {
        let layers = CollisionLayers::default();
        assert!(layers.contains(CollisionLayers::GROUND));
        assert!(layers.contains(CollisionLayers::WALL));
        assert!(!layers.contains(CollisionLayers::PROP));
    }

    #[test]
    fn test_layers_read_as_flag_names() {
        let wall: CollisionLayers = ron::from_str("\"WALL\"").unwrap();
        assert_eq!(wall, CollisionLayers::WALL);

        let both: CollisionLayers = ron::from_str("\"GROUND | PROP\"").unwrap();
        assert_eq!(both, CollisionLayers::GROUND | CollisionLayers::PROP);

        let text = ron::to_string(&CollisionLayers::default()).unwrap();
        assert_eq!(text, "\"GROUND | WALL\"");
    }
}
