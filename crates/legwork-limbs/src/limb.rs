//! Limb entity: one hip/knee/foot chain and its placement state

use glam::Vec2;

use crate::animation::{KneeFlipAnimator, RetractionAnimator, StepAnimator};
use crate::config::LegConfig;
use crate::error::RigError;
use crate::types::{BoneId, LimbId, SolverHandle};

/// Number of bones every limb must have: hip, knee, foot
pub const LIMB_BONE_COUNT: usize = 3;

/// One leg of a creature.
///
/// Geometry (`length`, `direction`) is captured from the bind pose and never
/// recomputed. Placement state is written by the placement engine only; the
/// animators own their own progress and never touch `target_position`.
#[derive(Debug, Clone)]
pub struct Limb {
    id: LimbId,
    bones: [BoneId; LIMB_BONE_COUNT],
    solver: SolverHandle,
    length: f32,
    /// Hip to foot at bind time, in the body's local frame
    direction: Vec2,
    spacing_from_base: f32,
    floating_distance: f32,

    pub(crate) target_position: Vec2,
    pub(crate) lerp_position: Vec2,
    /// Whether `lerp_position` came from solid ground (own probe or a neighbor)
    pub(crate) lerp_grounded: bool,
    pub(crate) is_in_ideal_position: bool,
    pub(crate) has_no_valid_position: bool,
    /// Set when the last completed step landed on a floating target
    pub(crate) is_floating: bool,
    pub(crate) last_step_at: Option<f32>,

    pub(crate) step: StepAnimator,
    pub(crate) retraction: RetractionAnimator,
    pub(crate) knee_flip: KneeFlipAnimator,
}

impl Limb {
    /// Build a limb from its bone chain and the bind-pose positions of those bones.
    ///
    /// `bind_rotation` is the body rotation at bind time; the stored probe
    /// direction is expressed relative to it.
    pub fn new(
        id: LimbId,
        bones: &[BoneId],
        positions: &[Vec2],
        bind_rotation: f32,
        solver: SolverHandle,
        config: &LegConfig,
    ) -> Result<Self, RigError> {
        if bones.len() != LIMB_BONE_COUNT || positions.len() != LIMB_BONE_COUNT {
            return Err(RigError::InvalidBoneCount {
                limb: id,
                count: bones.len(),
            });
        }

        let (hip, knee, foot) = (positions[0], positions[1], positions[2]);
        let length = hip.distance(knee) + knee.distance(foot);
        let reach = foot - hip;
        if length <= f32::EPSILON || reach.length_squared() <= f32::EPSILON {
            return Err(RigError::DegenerateLimb { limb: id });
        }

        let direction = Vec2::from_angle(-bind_rotation).rotate(reach.normalize());

        Ok(Self {
            id,
            bones: [bones[0], bones[1], bones[2]],
            solver,
            length,
            direction,
            spacing_from_base: config.spacing_from_base,
            floating_distance: config.floating_distance,
            target_position: foot,
            lerp_position: foot,
            lerp_grounded: false,
            is_in_ideal_position: false,
            // Nothing has been verified before the first tick
            has_no_valid_position: true,
            is_floating: false,
            last_step_at: None,
            step: StepAnimator::new(),
            retraction: RetractionAnimator::new(),
            knee_flip: KneeFlipAnimator::new(),
        })
    }

    pub fn id(&self) -> LimbId {
        self.id
    }

    pub fn bones(&self) -> &[BoneId; LIMB_BONE_COUNT] {
        &self.bones
    }

    pub fn hip(&self) -> BoneId {
        self.bones[0]
    }

    pub fn knee(&self) -> BoneId {
        self.bones[1]
    }

    pub fn foot(&self) -> BoneId {
        self.bones[2]
    }

    pub fn solver(&self) -> SolverHandle {
        self.solver
    }

    /// Hip-to-knee plus knee-to-foot at bind time
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Bind direction in the body's local frame
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Bind direction rotated into world space by the current body rotation
    pub fn world_direction(&self, rotation: f32) -> Vec2 {
        Vec2::from_angle(rotation).rotate(self.direction)
    }

    pub fn spacing_from_base(&self) -> f32 {
        self.spacing_from_base
    }

    pub fn floating_distance(&self) -> f32 {
        self.floating_distance
    }

    /// Where the foot should eventually be
    pub fn target_position(&self) -> Vec2 {
        self.target_position
    }

    /// Where the foot is animating to, or held at
    pub fn lerp_position(&self) -> Vec2 {
        self.lerp_position
    }

    pub fn is_in_ideal_position(&self) -> bool {
        self.is_in_ideal_position
    }

    pub fn has_no_valid_position(&self) -> bool {
        self.has_no_valid_position
    }

    pub fn is_floating(&self) -> bool {
        self.is_floating
    }

    /// Grounded from the renderer's point of view: standing on a grounded target
    pub fn is_grounded(&self) -> bool {
        !self.is_floating && self.lerp_grounded
    }

    pub fn is_stepping(&self) -> bool {
        self.step.is_stepping()
    }

    /// Clock time at which the most recent step started
    pub fn last_step_at(&self) -> Option<f32> {
        self.last_step_at
    }

    pub fn current_retraction(&self) -> f32 {
        self.retraction.current()
    }

    pub fn is_retracting(&self) -> bool {
        self.retraction.is_retracting()
    }

    pub fn is_extending(&self) -> bool {
        self.retraction.is_extending()
    }

    pub fn flip_completion(&self) -> f32 {
        self.knee_flip.completion()
    }

    pub fn is_flipping(&self) -> bool {
        self.knee_flip.is_flipping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bones() -> Vec<BoneId> {
        (0..3).map(BoneId::from_raw).collect()
    }

    #[test]
    fn test_limb_geometry_from_bind_pose() {
        let positions = [Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0)];
        let limb = Limb::new(
            LimbId::new(0),
            &bones(),
            &positions,
            0.0,
            SolverHandle::from_raw(0),
            &LegConfig::default(),
        )
        .unwrap();

        assert!((limb.length() - 2.0 * 2.0_f32.sqrt()).abs() < 1e-5);
        assert!((limb.direction() - Vec2::X).length() < 1e-5);
        assert_eq!(limb.target_position(), Vec2::new(2.0, 0.0));
        assert_eq!(limb.lerp_position(), Vec2::new(2.0, 0.0));
        assert!(limb.has_no_valid_position());
        assert_eq!(limb.current_retraction(), 0.0);
    }

    #[test]
    fn test_direction_is_body_local() {
        let positions = [Vec2::ZERO, Vec2::new(0.0, 1.0), Vec2::new(0.0, 2.0)];
        let limb = Limb::new(
            LimbId::new(0),
            &bones(),
            &positions,
            std::f32::consts::FRAC_PI_2,
            SolverHandle::from_raw(0),
            &LegConfig::default(),
        )
        .unwrap();

        // Bound pointing up while the body faced up: local +X
        assert!((limb.direction() - Vec2::X).length() < 1e-5);
        assert!((limb.world_direction(0.0) - Vec2::X).length() < 1e-5);
        assert!((limb.world_direction(std::f32::consts::PI) + Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_wrong_bone_count_rejected() {
        let result = Limb::new(
            LimbId::new(4),
            &bones()[..2],
            &[Vec2::ZERO, Vec2::X],
            0.0,
            SolverHandle::from_raw(0),
            &LegConfig::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            RigError::InvalidBoneCount {
                limb: LimbId::new(4),
                count: 2
            }
        );
    }

    #[test]
    fn test_zero_length_rejected() {
        let result = Limb::new(
            LimbId::new(1),
            &bones(),
            &[Vec2::ONE; 3],
            0.0,
            SolverHandle::from_raw(0),
            &LegConfig::default(),
        );
        assert!(matches!(result, Err(RigError::DegenerateLimb { .. })));
    }
}
