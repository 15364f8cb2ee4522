//! Collaborator traits for scene queries and inverse kinematics
//!
//! The placement core never talks to a physics engine or a transform
//! hierarchy directly. Everything it needs from the outside world goes
//! through these two traits.

use glam::Vec2;

use crate::types::{BoneId, CollisionLayers, SolverHandle};

/// Read-only collision queries against the scene
pub trait SceneQuery {
    /// Cast a ray and return the first surface point hit within `max_distance`
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<Vec2>;

    /// Check whether the segment `a`-`b` touches any wall on `layers`
    fn segment_hits_wall(&self, a: Vec2, b: Vec2, layers: CollisionLayers) -> bool;

    /// Check whether a single point lies inside a wall on `layers`
    fn overlaps_wall(&self, point: Vec2, layers: CollisionLayers) -> bool {
        self.segment_hits_wall(point, point, layers)
    }
}

/// Per-limb inverse-kinematics solver with one target per chain
pub trait IkSolver {
    /// Current world position of a bone
    fn bone_position(&self, bone: BoneId) -> Option<Vec2>;

    /// Current bend side of the chain
    fn flip(&self, solver: SolverHandle) -> bool;

    /// Choose the bend side of the chain
    fn set_flip(&mut self, solver: SolverHandle, flip: bool);

    /// Current world position of the chain's target
    fn target(&self, solver: SolverHandle) -> Vec2;

    /// Move the chain's target
    fn set_target(&mut self, solver: SolverHandle, position: Vec2);

    /// Re-solve the chain immediately instead of waiting for the next update
    fn force_solve(&mut self, solver: SolverHandle, strength: f32);

    /// Knee position the chain would have on the given bend side.
    ///
    /// Toggles the flip flag, solves, samples the knee and restores the
    /// original side. Solvers that can compute this directly should override it.
    fn sample_knee(&mut self, solver: SolverHandle, knee: BoneId, flip: bool) -> Option<Vec2> {
        let original = self.flip(solver);
        if original == flip {
            return self.bone_position(knee);
        }

        self.set_flip(solver, flip);
        self.force_solve(solver, 1.0);
        let sampled = self.bone_position(knee);
        self.set_flip(solver, original);
        self.force_solve(solver, 1.0);
        sampled
    }
}
