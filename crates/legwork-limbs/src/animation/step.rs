//! Step animation: moves the IK target from where it was to the limb's
//! lerp position.

use glam::Vec2;

use crate::tween::{EaseType, Transition};

/// Result of resuming the step task for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepUpdate {
    /// No step in flight
    Idle,
    /// Foot is travelling; the IK target belongs here this tick
    Moving(Vec2),
    /// Foot arrived exactly on its destination
    Landed(Vec2),
}

#[derive(Debug, Clone, PartialEq)]
struct StepTask {
    start: Vec2,
    transition: Transition,
}

/// Step state: not stepping → stepping → not stepping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepAnimator {
    task: Option<StepTask>,
}

impl StepAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a step from `from`. Replaces a running step.
    ///
    /// Returns `true` if a step in flight was interrupted.
    pub fn start(&mut self, from: Vec2, duration: f32, easing: EaseType) -> bool {
        let interrupted = self.task.is_some();
        self.task = Some(StepTask {
            start: from,
            transition: Transition::new(duration, easing),
        });
        interrupted
    }

    /// Resume for one tick, interpolating toward `destination`.
    ///
    /// The destination is read every tick so a lerp position updated while
    /// the step runs is still reached. Whether the landing spot is grounded
    /// belongs to that same destination, so the caller decides it on landing.
    pub fn advance(&mut self, dt: f32, destination: Vec2) -> StepUpdate {
        let Some(task) = self.task.as_mut() else {
            return StepUpdate::Idle;
        };

        let t = task.transition.advance(dt);
        if task.transition.is_complete() {
            self.task = None;
            return StepUpdate::Landed(destination);
        }

        StepUpdate::Moving(task.start.lerp(destination, t))
    }

    pub fn is_stepping(&self) -> bool {
        self.task.is_some()
    }

    /// Linear completion of the running step
    pub fn progress(&self) -> Option<f32> {
        self.task.as_ref().map(|t| t.transition.progress())
    }
}
