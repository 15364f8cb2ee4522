//! Per-creature leg tuning

use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::tween::EaseType;
use crate::types::CollisionLayers;

/// How a limb without a foothold picks a neighbor to borrow a target from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeighborPolicy {
    /// First valid limb in alternating clockwise/counter-clockwise order
    #[default]
    NearestFirst,
    /// Any valid limb reachable by the scan, chosen uniformly
    RandomValid,
}

/// Leg parameters shared by every limb of a creature.
///
/// `spacing_from_base` and `floating_distance` are copied into each limb
/// at build time; the rest is read by the placement engine every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegConfig {
    /// Minimum distance a floating foot keeps from its hip
    pub spacing_from_base: f32,
    /// Where a floating foot rests between `spacing_from_base` (0) and full reach (1)
    pub floating_distance: f32,
    /// Jitter applied to floating placement, as a fraction of the reach left over
    pub placement_range: f32,
    /// Let feet hang in the air when no ground is in reach
    pub allow_floating: bool,
    /// Seconds for a foot to travel to its new target
    pub step_duration: f32,
    /// Easing applied to step interpolation
    pub step_easing: EaseType,
    /// Seconds for a full retraction or extension
    pub retract_duration: f32,
    /// Seconds for a full knee flip blend
    pub flip_duration: f32,
    /// Strength passed to forced IK solves
    pub solve_strength: f32,
    /// Fallback limb selection
    pub neighbor_policy: NeighborPolicy,
    /// Layers the ground probe and knee checks collide with
    pub collision_layers: CollisionLayers,
}

impl Default for LegConfig {
    fn default() -> Self {
        Self {
            spacing_from_base: 1.0,
            floating_distance: 0.75,
            placement_range: 0.25,
            allow_floating: false,
            step_duration: 0.2,
            step_easing: EaseType::Linear,
            retract_duration: 0.5,
            flip_duration: 0.25,
            solve_strength: 1.0,
            neighbor_policy: NeighborPolicy::NearestFirst,
            collision_layers: CollisionLayers::default(),
        }
    }
}

impl LegConfig {
    /// Check that every value is inside its meaningful range
    pub fn validate(&self) -> Result<(), RigError> {
        let non_negative = [
            ("spacing_from_base", self.spacing_from_base),
            ("step_duration", self.step_duration),
            ("retract_duration", self.retract_duration),
            ("flip_duration", self.flip_duration),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(RigError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let fractions = [
            ("floating_distance", self.floating_distance),
            ("placement_range", self.placement_range),
            ("solve_strength", self.solve_strength),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(RigError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
