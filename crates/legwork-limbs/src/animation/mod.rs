//! Per-limb animations
//!
//! Each limb owns at most one running task of each kind. The placement
//! engine starts or replaces tasks while deciding, then resumes every
//! running task once per tick after all decisions are committed.

mod knee_flip;
mod retraction;
mod step;

pub use knee_flip::KneeFlipAnimator;
pub use retraction::RetractionAnimator;
pub use step::{StepAnimator, StepUpdate};
