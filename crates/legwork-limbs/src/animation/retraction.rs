//! Retraction animation: pulls a foot toward its hip when it has nowhere
//! to stand, and extends it again once a foothold is back.

use crate::tween::UnitTween;

/// Tracks how hidden a limb is: 0 = fully deployed, 1 = fully retracted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetractionAnimator {
    tween: UnitTween,
}

impl RetractionAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animate toward `target`, replacing a running retraction or extension.
    /// Duration is `base_duration * |target - current|`.
    pub fn start(&mut self, target: f32, base_duration: f32) {
        self.tween.start(target, base_duration);
    }

    /// Resume for one tick. Returns `true` while still moving.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.tween.advance(dt)
    }

    /// Current retraction in `[0, 1]`
    pub fn current(&self) -> f32 {
        self.tween.value()
    }

    pub fn is_retracting(&self) -> bool {
        self.tween.is_rising()
    }

    pub fn is_extending(&self) -> bool {
        self.tween.is_falling()
    }

    pub fn is_fully_retracted(&self) -> bool {
        self.current() >= 1.0
    }

    pub fn is_fully_deployed(&self) -> bool {
        self.current() <= 0.0
    }

    /// Seconds left before the running transition settles
    pub fn remaining(&self) -> f32 {
        self.tween.remaining()
    }
}
