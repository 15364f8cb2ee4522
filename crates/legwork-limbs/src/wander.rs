//! Body wander movement
//!
//! Moves a creature body toward a goal in small randomized hops. Every few
//! seconds a new waypoint is picked roughly toward the goal; the body eases
//! onto it with a critically damped spring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::rng::PlacementRng;

/// Wander tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    /// Inverse of the smoothing time used to follow the waypoint
    pub speed: f32,
    /// Nominal distance between waypoints
    pub step_distance: f32,
    /// Random spread added to `step_distance` in both directions
    pub step_distance_range: f32,
    /// Nominal seconds between waypoint updates
    pub update_interval: f32,
    /// Total width of the random window around `update_interval`
    pub interval_range: f32,
    /// Total width of the random heading deviation, in degrees
    pub deviation_degrees: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            step_distance: 0.5,
            step_distance_range: 1.0,
            update_interval: 1.0,
            interval_range: 1.0,
            deviation_degrees: 1.0,
        }
    }
}

impl WanderConfig {
    pub fn validate(&self) -> Result<(), RigError> {
        let fields = [
            ("speed", self.speed),
            ("step_distance", self.step_distance),
            ("step_distance_range", self.step_distance_range),
            ("update_interval", self.update_interval),
            ("interval_range", self.interval_range),
            ("deviation_degrees", self.deviation_degrees),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(RigError::InvalidConfig(format!(
                    "wander {} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.speed <= 0.0 {
            return Err(RigError::InvalidConfig(
                "wander speed must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Randomized goal-seeking body movement
#[derive(Debug, Clone)]
pub struct Wanderer {
    config: WanderConfig,
    position: Vec2,
    goal: Vec2,
    waypoint: Vec2,
    velocity: Vec2,
    /// Seconds until the next waypoint is picked
    countdown: f32,
}

impl Wanderer {
    pub fn new(config: WanderConfig, position: Vec2, goal: Vec2) -> Result<Self, RigError> {
        config.validate()?;
        Ok(Self {
            config,
            position,
            goal,
            waypoint: position,
            velocity: Vec2::ZERO,
            countdown: 0.0,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn waypoint(&self) -> Vec2 {
        self.waypoint
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn goal(&self) -> Vec2 {
        self.goal
    }

    /// Advance by `dt` seconds and return the new body position
    pub fn update(&mut self, dt: f32, rng: &mut impl PlacementRng) -> Vec2 {
        self.countdown -= dt;
        if self.countdown <= 0.0 {
            self.waypoint = self.next_waypoint(rng);
            let half = self.config.interval_range / 2.0;
            self.countdown = rng
                .range_f32(
                    self.config.update_interval - half,
                    self.config.update_interval + half,
                )
                .max(0.0);
        }

        self.position = smooth_damp(
            self.position,
            self.waypoint,
            &mut self.velocity,
            1.0 / self.config.speed,
            dt,
        );
        self.position
    }

    fn next_waypoint(&self, rng: &mut impl PlacementRng) -> Vec2 {
        let to_goal = self.goal - self.position;
        let Some(direction) = to_goal.try_normalize() else {
            return self.position;
        };

        let half = self.config.deviation_degrees.to_radians() / 2.0;
        let deviated = Vec2::from_angle(rng.range_f32(-half, half)).rotate(direction);

        let step = self.config.step_distance;
        let spread = self.config.step_distance_range;
        let max_distance = rng.range_f32((step - spread).max(0.0), step + spread);
        let distance = to_goal.length().min(max_distance);

        log::trace!(
            "Wander: next waypoint {:.2} away toward ({:.2}, {:.2})",
            distance,
            self.goal.x,
            self.goal.y
        );

        self.position + deviated * distance
    }
}

/// Critically damped spring toward `target`, reaching it in roughly
/// `smooth_time` seconds without overshooting.
pub fn smooth_damp(
    current: Vec2,
    target: Vec2,
    velocity: &mut Vec2,
    smooth_time: f32,
    dt: f32,
) -> Vec2 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    // Passed the target: stop on it
    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec2::ZERO;
        return target;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let mut position = Vec2::ZERO;
        let mut velocity = Vec2::ZERO;
        let target = Vec2::new(10.0, 0.0);

        for _ in 0..600 {
            position = smooth_damp(position, target, &mut velocity, 0.5, 1.0 / 60.0);
            assert!(position.x <= target.x + 1e-4);
        }
        assert!((position - target).length() < 1e-2);
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_noop() {
        let mut velocity = Vec2::new(1.0, 0.0);
        let p = smooth_damp(Vec2::ZERO, Vec2::X, &mut velocity, 1.0, 0.0);
        assert_eq!(p, Vec2::ZERO);
        assert_eq!(velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_wanderer_moves_toward_goal() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let goal = Vec2::new(20.0, 0.0);
        let mut wanderer = Wanderer::new(WanderConfig::default(), Vec2::ZERO, goal).unwrap();

        for _ in 0..600 {
            wanderer.update(1.0 / 60.0, &mut rng);
        }

        assert!(wanderer.position().x > 1.0);
        assert!(wanderer.position().distance(goal) < 20.0);
        // Deviation is at most half a degree each hop
        assert!(wanderer.position().y.abs() < 1.0);
    }

    #[test]
    fn test_waypoint_never_passes_goal() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        let goal = Vec2::new(0.2, 0.0);
        let config = WanderConfig {
            step_distance: 5.0,
            deviation_degrees: 0.0,
            ..Default::default()
        };
        let mut wanderer = Wanderer::new(config, Vec2::ZERO, goal).unwrap();
        wanderer.update(0.01, &mut rng);

        assert!((wanderer.waypoint() - goal).length() < 1e-5);
    }

    #[test]
    fn test_wander_is_deterministic_for_seed() {
        let run = |seed| {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut w =
                Wanderer::new(WanderConfig::default(), Vec2::ZERO, Vec2::new(5.0, 5.0)).unwrap();
            for _ in 0..120 {
                w.update(1.0 / 60.0, &mut rng);
            }
            w.position()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_invalid_wander_config() {
        let config = WanderConfig {
            speed: 0.0,
            ..Default::default()
        };
        assert!(Wanderer::new(config, Vec2::ZERO, Vec2::X).is_err());
    }
}
