//! Render data extraction
//!
//! The renderer draws each leg as a polyline through its bones. Retraction
//! pulls every bone toward the hip and the knee slides between its two bend
//! sides while a flip blend is running.

use glam::Vec2;

use crate::limb::Limb;
use crate::traits::IkSolver;
use crate::types::LimbId;

/// Per-limb data consumed once per tick by the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct LimbRenderData {
    pub limb: LimbId,
    /// Hip, knee and foot with retraction and knee blending applied
    pub bones: [Vec2; 3],
    pub lerp_position: Vec2,
    pub retraction: f32,
    pub grounded: bool,
}

impl LimbRenderData {
    /// Sample a limb's bones from the solver and apply the visual blends
    pub fn capture(limb: &Limb, ik: &mut impl IkSolver) -> Option<Self> {
        let hip = ik.bone_position(limb.hip())?;
        let foot = ik.bone_position(limb.foot())?;
        let knee = blended_knee(limb, ik)?;

        let extension = 1.0 - limb.current_retraction();
        let retract = |p: Vec2| hip + (p - hip) * extension;

        Some(Self {
            limb: limb.id(),
            bones: [hip, retract(knee), retract(foot)],
            lerp_position: limb.lerp_position(),
            retraction: limb.current_retraction(),
            grounded: limb.is_grounded(),
        })
    }
}

/// Knee position, blended between bend sides by the flip animation
fn blended_knee(limb: &Limb, ik: &mut impl IkSolver) -> Option<Vec2> {
    if !limb.is_flipping() {
        return ik.bone_position(limb.knee());
    }

    let unflipped = ik.sample_knee(limb.solver(), limb.knee(), false)?;
    let flipped = ik.sample_knee(limb.solver(), limb.knee(), true)?;
    Some(unflipped.lerp(flipped, limb.flip_completion()))
}

/// Render data for a whole creature
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureRenderData {
    /// Position of the limb base the leg lines start from
    pub base: Vec2,
    pub limbs: Vec<LimbRenderData>,
}
