//! Reference two-bone IK solver
//!
//! Analytic hip/knee/foot solve over a [`Skeleton`], one chain per limb.
//! The flip flag picks which side of the hip-target line the knee bends to.

use glam::Vec2;

use crate::error::RigError;
use crate::skeleton::Skeleton;
use crate::traits::IkSolver;
use crate::types::{BoneId, SolverHandle};

#[derive(Debug, Clone)]
struct IkChain {
    bones: [BoneId; 3],
    upper: f32,
    lower: f32,
    target: Vec2,
    flip: bool,
}

/// Two-bone solver owning the skeleton it poses
#[derive(Debug, Clone, Default)]
pub struct TwoBoneIk {
    skeleton: Skeleton,
    chains: Vec<IkChain>,
}

impl TwoBoneIk {
    pub fn new(skeleton: Skeleton) -> Self {
        Self {
            skeleton,
            chains: Vec::new(),
        }
    }

    /// Register a hip/knee/foot chain. Its target starts on the foot.
    pub fn add_chain(&mut self, bones: [BoneId; 3]) -> Result<SolverHandle, RigError> {
        let mut positions = [Vec2::ZERO; 3];
        for (slot, bone) in positions.iter_mut().zip(bones) {
            *slot = self
                .skeleton
                .position(bone)
                .ok_or(RigError::UnknownBone(bone))?;
        }

        let handle = SolverHandle(self.chains.len());
        self.chains.push(IkChain {
            bones,
            upper: positions[0].distance(positions[1]),
            lower: positions[1].distance(positions[2]),
            target: positions[2],
            flip: false,
        });
        Ok(handle)
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Solve every chain, the per-frame pass of the solver
    pub fn solve_all(&mut self, strength: f32) {
        for index in 0..self.chains.len() {
            self.solve_chain(index, strength);
        }
    }

    /// Knee and foot positions for a chain without applying them
    fn pose(&self, chain: &IkChain, flip: bool) -> Option<(Vec2, Vec2)> {
        let hip = self.skeleton.position(chain.bones[0])?;
        let to_target = chain.target - hip;
        let reach = chain.upper + chain.lower;
        let min_reach = (chain.upper - chain.lower).abs();

        let distance = to_target.length();
        if distance <= f32::EPSILON {
            return None;
        }
        let clamped = distance.clamp(min_reach, reach);
        let direction = to_target / distance;

        // Law of cosines for the angle at the hip
        let cos_hip = ((chain.upper * chain.upper + clamped * clamped
            - chain.lower * chain.lower)
            / (2.0 * chain.upper * clamped))
            .clamp(-1.0, 1.0);
        let hip_angle = cos_hip.acos();
        let side = if flip { -hip_angle } else { hip_angle };

        let knee = hip + Vec2::from_angle(side).rotate(direction) * chain.upper;
        let foot = hip + direction * clamped;
        Some((knee, foot))
    }

    fn solve_chain(&mut self, index: usize, strength: f32) {
        let Some(chain) = self.chains.get(index) else {
            return;
        };
        let Some((knee, foot)) = self.pose(chain, chain.flip) else {
            return;
        };

        let strength = strength.clamp(0.0, 1.0);
        let [_, knee_bone, foot_bone] = chain.bones;
        for (bone, solved) in [(knee_bone, knee), (foot_bone, foot)] {
            let Some(current) = self.skeleton.position(bone) else {
                continue;
            };
            if let Err(err) = self.skeleton.set_position(bone, current.lerp(solved, strength)) {
                log::warn!("IK chain {}: {}", index, err);
            }
        }
    }
}

impl IkSolver for TwoBoneIk {
    fn bone_position(&self, bone: BoneId) -> Option<Vec2> {
        self.skeleton.position(bone)
    }

    fn flip(&self, solver: SolverHandle) -> bool {
        self.chains.get(solver.0).is_some_and(|c| c.flip)
    }

    fn set_flip(&mut self, solver: SolverHandle, flip: bool) {
        if let Some(chain) = self.chains.get_mut(solver.0) {
            chain.flip = flip;
        }
    }

    fn target(&self, solver: SolverHandle) -> Vec2 {
        self.chains
            .get(solver.0)
            .map(|c| c.target)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_target(&mut self, solver: SolverHandle, position: Vec2) {
        if let Some(chain) = self.chains.get_mut(solver.0) {
            chain.target = position;
        }
    }

    fn force_solve(&mut self, solver: SolverHandle, strength: f32) {
        self.solve_chain(solver.0, strength);
    }

    fn sample_knee(&mut self, solver: SolverHandle, knee: BoneId, flip: bool) -> Option<Vec2> {
        let chain = self.chains.get(solver.0)?;
        if chain.bones[1] != knee {
            return None;
        }
        self.pose(chain, flip).map(|(knee, _)| knee)
    }
}
