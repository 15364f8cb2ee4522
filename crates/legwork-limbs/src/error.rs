//! Error types for rig construction and configuration.

use thiserror::Error;

use crate::types::{BoneId, LimbId};

/// Errors raised while building a creature rig.
///
/// None of these occur during a tick: once a rig is built, per-tick
/// failures are expressed as limb state (`has_no_valid_position`), not errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RigError {
    /// A limb chain does not consist of exactly hip, knee and foot.
    #[error("limb {limb} has {count} bones, expected 3 (hip, knee, foot)")]
    InvalidBoneCount {
        /// Limb that failed to build.
        limb: LimbId,
        /// Number of bones found in its chain.
        count: usize,
    },

    /// Hip and foot coincide at bind time, so no direction can be derived.
    #[error("limb {limb} has zero length at bind time")]
    DegenerateLimb {
        /// Limb that failed to build.
        limb: LimbId,
    },

    /// A bone id does not belong to the skeleton.
    #[error("unknown bone {0}")]
    UnknownBone(BoneId),

    /// No limb survived construction.
    #[error("rig has no valid limbs")]
    EmptyRig,

    /// A configuration value is out of range.
    #[error("invalid leg configuration: {0}")]
    InvalidConfig(String),
}
