//! Rig construction
//!
//! Turns a skeleton into a ready-to-tick [`Rig`]: every direct child of the
//! limb base starts one limb chain. Chains that are not exactly
//! hip/knee/foot are logged and skipped, the rest become limbs with ids in
//! build order.

use glam::Vec2;

use crate::config::LegConfig;
use crate::error::RigError;
use crate::ik::TwoBoneIk;
use crate::limb::{LIMB_BONE_COUNT, Limb};
use crate::placement::PlacementEngine;
use crate::render::CreatureRenderData;
use crate::skeleton::Skeleton;
use crate::types::{BoneId, LimbId, SolverHandle};

/// A creature's legs: solver, placement engine and the base they hang from
#[derive(Debug, Clone)]
pub struct Rig {
    pub ik: TwoBoneIk,
    pub engine: PlacementEngine,
    pub base: BoneId,
}

impl Rig {
    pub fn base_position(&self) -> Vec2 {
        self.ik.skeleton().position(self.base).unwrap_or_default()
    }

    /// Move the base and every bone hanging from it
    pub fn move_base(&mut self, position: Vec2) -> Result<(), RigError> {
        let delta = position - self.base_position();
        self.ik.skeleton_mut().translate_subtree(self.base, delta)
    }

    pub fn render_data(&mut self) -> CreatureRenderData {
        CreatureRenderData {
            base: self.base_position(),
            limbs: self.engine.render_data(&mut self.ik),
        }
    }
}

/// Builds a [`Rig`] from a skeleton
#[derive(Debug, Clone, Default)]
pub struct RigBuilder {
    config: LegConfig,
    bind_rotation: f32,
}

impl RigBuilder {
    pub fn new(config: LegConfig) -> Self {
        Self {
            config,
            bind_rotation: 0.0,
        }
    }

    /// Body rotation the skeleton was authored at
    pub fn bind_rotation(mut self, rotation: f32) -> Self {
        self.bind_rotation = rotation;
        self
    }

    pub fn build(self, skeleton: Skeleton, base: BoneId) -> Result<Rig, RigError> {
        self.config.validate()?;

        let mut ik = TwoBoneIk::new(skeleton);
        let starts = ik.skeleton_mut().direct_children(base)?;

        let mut limbs = Vec::with_capacity(starts.len());
        for start in starts {
            let id = LimbId::new(limbs.len());
            match self.build_limb(&mut ik, id, start) {
                Ok(limb) => limbs.push(limb),
                Err(e) => log::warn!("Skipping limb starting at {}: {}", start, e),
            }
        }

        if limbs.is_empty() {
            return Err(RigError::EmptyRig);
        }

        log::info!(
            "Built rig with {} limbs ({} bones)",
            limbs.len(),
            ik.skeleton().len()
        );

        let engine = PlacementEngine::new(limbs, self.config)?;
        Ok(Rig { ik, engine, base })
    }

    fn build_limb(&self, ik: &mut TwoBoneIk, id: LimbId, start: BoneId) -> Result<Limb, RigError> {
        let chain = ik.skeleton_mut().limb_chain(start)?;
        if chain.len() != LIMB_BONE_COUNT {
            return Err(RigError::InvalidBoneCount {
                limb: id,
                count: chain.len(),
            });
        }

        let mut positions = Vec::with_capacity(LIMB_BONE_COUNT);
        for &bone in &chain {
            positions.push(
                ik.skeleton()
                    .position(bone)
                    .ok_or(RigError::UnknownBone(bone))?,
            );
        }

        // Validate before registering so a rejected limb leaves no solver chain
        let handle = SolverHandle(ik.chain_count());
        let limb = Limb::new(id, &chain, &positions, self.bind_rotation, handle, &self.config)?;
        let registered = ik.add_chain([chain[0], chain[1], chain[2]])?;
        debug_assert_eq!(registered, handle);
        Ok(limb)
    }
}
