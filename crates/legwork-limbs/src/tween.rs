//! Time-bounded interpolation primitives.
//!
//! A [`Transition`] is the per-tick body of every limb animation: it is
//! resumed once per tick with the frame's delta time and reports eased
//! progress until it completes. Cancelling an animation simply drops its
//! `Transition`, so nothing of the remaining interpolation is ever applied.

use keyframe::{ease, functions};
use serde::{Deserialize, Serialize};

/// Elapsed time within this margin of the duration counts as complete.
/// Absorbs the rounding of summed frame deltas such as `1/60`.
const COMPLETION_EPSILON: f32 = 1e-5;

/// Easing function type for animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EaseType {
    /// Constant speed interpolation
    #[default]
    Linear,
    /// Slow start, fast end
    EaseIn,
    /// Fast start, slow end
    EaseOut,
    /// Slow start and end, fast middle
    EaseInOut,
}

impl EaseType {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = (t as f64).clamp(0.0, 1.0);
        let result = match self {
            EaseType::Linear => ease(functions::Linear, 0.0, 1.0, t),
            EaseType::EaseIn => ease(functions::EaseIn, 0.0, 1.0, t),
            EaseType::EaseOut => ease(functions::EaseOut, 0.0, 1.0, t),
            EaseType::EaseInOut => ease(functions::EaseInOut, 0.0, 1.0, t),
        };
        result as f32
    }
}

/// A running interpolation, advanced once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    elapsed: f32,
    duration: f32,
    easing: EaseType,
}

impl Transition {
    pub fn new(duration: f32, easing: EaseType) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(0.0),
            easing,
        }
    }

    /// Resume for one tick and return the eased progress in `[0, 1]`.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        if self.is_complete() {
            self.elapsed = self.duration;
            return 1.0;
        }
        self.easing.apply(self.elapsed / self.duration)
    }

    /// Linear progress without easing
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed + COMPLETION_EPSILON >= self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// A scalar in `[0, 1]` animated linearly toward 0 or 1.
///
/// Durations scale with the distance left to travel: a full 0↔1 swing
/// takes the base duration, half a swing takes half of it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitTween {
    value: f32,
    from: f32,
    to: f32,
    transition: Option<Transition>,
}

impl UnitTween {
    pub fn new(value: f32) -> Self {
        let value = value.clamp(0.0, 1.0);
        Self {
            value,
            from: value,
            to: value,
            transition: None,
        }
    }

    /// Start moving toward `target`, replacing any running transition.
    pub fn start(&mut self, target: f32, base_duration: f32) {
        let target = target.clamp(0.0, 1.0);
        let distance = (target - self.value).abs();

        self.from = self.value;
        self.to = target;

        if distance <= f32::EPSILON || base_duration <= 0.0 {
            self.value = target;
            self.transition = None;
            return;
        }

        self.transition = Some(Transition::new(base_duration * distance, EaseType::Linear));
    }

    /// Resume for one tick. Returns `true` while still moving.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };

        let t = transition.advance(dt);
        if transition.is_complete() {
            self.value = self.to;
            self.transition = None;
            return false;
        }

        self.value = (self.from + (self.to - self.from) * t).clamp(0.0, 1.0);
        true
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Destination of the running transition
    pub fn target(&self) -> Option<f32> {
        self.transition.as_ref().map(|_| self.to)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn is_rising(&self) -> bool {
        self.transition.is_some() && self.to > self.from
    }

    pub fn is_falling(&self) -> bool {
        self.transition.is_some() && self.to < self.from
    }

    /// Seconds left in the running transition
    pub fn remaining(&self) -> f32 {
        self.transition
            .as_ref()
            .map(|t| (t.duration() - t.elapsed()).max(0.0))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_linear() {
        let mut transition = Transition::new(1.0, EaseType::Linear);

        assert!((transition.advance(0.5) - 0.5).abs() < 1e-5);
        assert!(!transition.is_complete());
        assert_eq!(transition.advance(0.5), 1.0);
        assert!(transition.is_complete());
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut transition = Transition::new(0.0, EaseType::Linear);
        assert_eq!(transition.advance(0.0), 1.0);
        assert!(transition.is_complete());
    }

    #[test]
    fn test_ease_out_faster_at_start() {
        let mut linear = Transition::new(1.0, EaseType::Linear);
        let mut ease_out = Transition::new(1.0, EaseType::EaseOut);

        assert!(ease_out.advance(0.25) > linear.advance(0.25));
    }

    #[test]
    fn test_sixtieths_complete_on_time() {
        let mut transition = Transition::new(1.0, EaseType::Linear);
        for _ in 0..59 {
            transition.advance(1.0 / 60.0);
        }
        assert!(!transition.is_complete());
        transition.advance(1.0 / 60.0);
        assert!(transition.is_complete());
    }

    #[test]
    fn test_unit_tween_scales_duration_by_distance() {
        let mut tween = UnitTween::new(0.5);
        tween.start(1.0, 2.0);
        assert!((tween.remaining() - 1.0).abs() < 1e-5);

        assert!(tween.advance(0.5));
        assert!((tween.value() - 0.75).abs() < 1e-5);
        assert!(!tween.advance(0.5));
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn test_unit_tween_direction_flags() {
        let mut tween = UnitTween::new(0.0);
        assert!(!tween.is_rising() && !tween.is_falling());

        tween.start(1.0, 1.0);
        assert!(tween.is_rising());
        assert!(!tween.is_falling());

        tween.advance(0.25);
        tween.start(0.0, 1.0);
        assert!(tween.is_falling());
        assert!(!tween.is_rising());
    }

    #[test]
    fn test_unit_tween_start_at_target_is_noop() {
        let mut tween = UnitTween::new(1.0);
        tween.start(1.0, 1.0);
        assert!(!tween.is_animating());
        assert_eq!(tween.value(), 1.0);
    }
}
