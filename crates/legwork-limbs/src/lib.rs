//! Procedural foot placement for multi-legged creatures
//!
//! This crate implements:
//! - Limbs built from hip/knee/foot bone chains of a skeleton
//! - Ground probing, floating placement and target borrowing between limbs
//! - Step, retraction and knee-flip animations driven once per tick
//! - A reference two-bone IK solver and render data extraction
//!
//! The scene and the IK solver are reached only through [`SceneQuery`] and
//! [`IkSolver`], so any physics backend can sit behind them.

pub mod animation;
pub mod config;
pub mod error;
pub mod ik;
pub mod limb;
pub mod neighbor;
pub mod placement;
pub mod probe;
pub mod render;
pub mod rig;
pub mod rng;
pub mod skeleton;
pub mod traits;
pub mod tween;
pub mod types;
pub mod wander;

// Re-export main types for convenience
pub use config::{LegConfig, NeighborPolicy};
pub use error::RigError;
pub use ik::TwoBoneIk;
pub use limb::Limb;
pub use placement::{PlacementEngine, TickReport};
pub use render::{CreatureRenderData, LimbRenderData};
pub use rig::{Rig, RigBuilder};
pub use rng::PlacementRng;
pub use skeleton::Skeleton;
pub use traits::{IkSolver, SceneQuery};
pub use tween::EaseType;
pub use types::{BodyPose, BoneId, CollisionLayers, FrameTime, LimbId, SolverHandle};
pub use wander::{WanderConfig, Wanderer};
