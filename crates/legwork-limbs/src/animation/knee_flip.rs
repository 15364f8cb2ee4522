//! Knee flip blend: a cosmetic 0↔1 value the renderer uses to slide the
//! knee between the two bend sides instead of popping.

use crate::tween::UnitTween;

/// Visual blend between bend sides. 0 = unflipped knee, 1 = flipped knee.
///
/// The solver's flip flag stays authoritative; this only smooths how the
/// change is drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KneeFlipAnimator {
    tween: UnitTween,
    flipped: bool,
}

impl KneeFlipAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invert the blend target, starting from the current completion.
    pub fn trigger(&mut self, base_duration: f32) {
        self.flipped = !self.flipped;
        let target = if self.flipped { 1.0 } else { 0.0 };
        self.tween.start(target, base_duration);
    }

    /// Blend toward an explicit side, triggering only if it differs
    pub fn show(&mut self, flipped: bool, base_duration: f32) {
        if self.flipped != flipped {
            self.trigger(base_duration);
        }
    }

    /// Resume for one tick. Returns `true` while still blending.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.tween.advance(dt)
    }

    pub fn completion(&self) -> f32 {
        self.tween.value()
    }

    /// Side the blend is heading to
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_flipping(&self) -> bool {
        self.tween.is_animating()
    }
}
