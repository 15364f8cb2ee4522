//! Headless creature simulation
//!
//! Owns everything a creature needs to walk around a scenario: the terrain,
//! the rig, the wander controller and one seeded RNG. Each tick moves the
//! body, ticks the placement engine, lets the solver catch up and folds the
//! tick's counters into a [`RunReport`].

use anyhow::{Context, Result};
use glam::Vec2;
use legwork_limbs::{
    BodyPose, CreatureRenderData, FrameTime, Rig, RigBuilder, Skeleton, TickReport, Wanderer,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::AppConfig;
use crate::scenario::Scenario;
use crate::terrain::Terrain;

/// Strength of the per-tick solver pass
const SOLVE_STRENGTH: f32 = 1.0;

/// Totals over a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub ticks: usize,
    pub steps_started: usize,
    pub steps_interrupted: usize,
    pub relocations: usize,
    pub knee_flips: usize,
    pub retractions_started: usize,
    /// Sum over ticks of limbs without a valid position
    pub invalid_limb_ticks: usize,
    /// Highest retraction any limb reached
    pub max_retraction: f32,
    /// Straight-line distance from spawn to the final body position
    pub displacement: f32,
}

impl RunReport {
    fn record(&mut self, tick: &TickReport) {
        self.ticks += 1;
        self.steps_started += tick.steps_started;
        self.steps_interrupted += tick.steps_interrupted;
        self.relocations += tick.relocations;
        self.knee_flips += tick.knee_flips;
        self.retractions_started += tick.retractions_started;
        self.invalid_limb_ticks += tick.invalid_limbs;
    }

    pub fn log(&self) {
        log::info!("Ticks simulated:     {}", self.ticks);
        log::info!("Steps started:       {}", self.steps_started);
        log::info!("Steps interrupted:   {}", self.steps_interrupted);
        log::info!("Knee relocations:    {}", self.relocations);
        log::info!("Knee flips:          {}", self.knee_flips);
        log::info!("Retractions started: {}", self.retractions_started);
        log::info!("Invalid limb-ticks:  {}", self.invalid_limb_ticks);
        log::info!("Max retraction:      {:.2}", self.max_retraction);
        log::info!("Displacement:        {:.2}", self.displacement);
    }
}

/// One creature walking around one scenario
pub struct Simulation {
    terrain: Terrain,
    rig: Rig,
    wanderer: Wanderer,
    rng: Xoshiro256StarStar,
    pose: BodyPose,
    spawn: Vec2,
    delta_time: f32,
    clock: f32,
    report: RunReport,
}

impl Simulation {
    pub fn new(scenario: &Scenario, config: &AppConfig) -> Result<Self> {
        let (skeleton, base) =
            Skeleton::radial(scenario.spawn, config.run.leg_count, config.run.leg_length);
        let mut rig = RigBuilder::new(config.legs.clone())
            .build(skeleton, base)
            .context("Failed to build creature rig")?;
        let terrain = scenario.terrain();
        let pose = BodyPose::new(scenario.spawn, 0.0);
        rig.engine.prime(&terrain, &rig.ik, pose.rotation);
        let wanderer = Wanderer::new(config.wander.clone(), scenario.spawn, scenario.goal)
            .context("Failed to set up wandering")?;

        log::info!(
            "Scenario '{}': {} walls, {} legs, seed {}",
            scenario.name,
            scenario.walls.len(),
            rig.engine.limbs().len(),
            config.run.seed
        );

        Ok(Self {
            terrain,
            rig,
            wanderer,
            rng: Xoshiro256StarStar::seed_from_u64(config.run.seed),
            pose,
            spawn: scenario.spawn,
            delta_time: config.run.delta_time,
            clock: 0.0,
            report: RunReport::default(),
        })
    }

    /// Advance by one tick
    pub fn tick(&mut self) -> Result<TickReport> {
        // The body only translates; its rotation stays at the bind rotation
        self.pose.position = self.wanderer.update(self.delta_time, &mut self.rng);
        self.rig.move_base(self.pose.position)?;

        let time = FrameTime::new(self.delta_time, self.clock);
        let tick = self.rig.engine.tick(
            &self.terrain,
            &mut self.rig.ik,
            &mut self.rng,
            self.pose.rotation,
            time,
        );
        self.rig.ik.solve_all(SOLVE_STRENGTH);
        self.clock += self.delta_time;

        self.report.record(&tick);
        for limb in self.rig.engine.limbs() {
            self.report.max_retraction = self.report.max_retraction.max(limb.current_retraction());
        }
        self.report.displacement = self.spawn.distance(self.pose.position);

        Ok(tick)
    }

    /// Advance by `ticks` ticks and return the totals so far
    pub fn run(&mut self, ticks: usize) -> Result<&RunReport> {
        for _ in 0..ticks {
            self.tick()?;
        }
        log::debug!(
            "Ran {} ticks, body at ({:.2}, {:.2})",
            ticks,
            self.body_position().x,
            self.body_position().y
        );
        Ok(&self.report)
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn pose(&self) -> BodyPose {
        self.pose
    }

    pub fn body_position(&self) -> Vec2 {
        self.pose.position
    }

    pub fn render_data(&mut self) -> CreatureRenderData {
        self.rig.render_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> AppConfig {
        let mut config = AppConfig::default();
        config.run.seed = seed;
        config
    }

    #[test]
    fn test_flat_run_walks_and_steps() {
        let mut sim = Simulation::new(&Scenario::flat(), &config(1)).unwrap();
        let report = sim.run(600).unwrap().clone();

        assert_eq!(report.ticks, 600);
        assert!(report.steps_started > 0);
        assert!(report.displacement > 0.5);
        assert!(sim.body_position().x > 0.5);
        assert!((0.0..=1.0).contains(&report.max_retraction));
    }

    #[test]
    fn test_upper_legs_do_not_retract_at_spawn() {
        let mut sim = Simulation::new(&Scenario::flat(), &config(1)).unwrap();
        let first = sim.tick().unwrap();
        assert_eq!(first.invalid_limbs, 0);
        assert_eq!(first.retractions_started, 0);
        assert!(sim.rig().engine.limbs().iter().all(|l| !l.is_retracting()));
    }

    #[test]
    fn test_runs_are_deterministic() {
        let run = |seed| {
            let mut sim = Simulation::new(&Scenario::flat(), &config(seed)).unwrap();
            sim.run(200).unwrap().clone()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_pit_retracts_legs() {
        // Start right above the hole
        let mut scenario = Scenario::pit();
        scenario.spawn = Vec2::new(6.5, 1.0);
        scenario.goal = scenario.spawn;

        let mut sim = Simulation::new(&scenario, &config(3)).unwrap();
        let report = sim.run(120).unwrap();

        assert!(report.invalid_limb_ticks > 0);
        assert_eq!(report.max_retraction, 1.0);
        assert!(
            sim.rig()
                .engine
                .limbs()
                .iter()
                .all(|l| l.has_no_valid_position())
        );
    }

    #[test]
    fn test_render_data_for_every_leg() {
        let mut sim = Simulation::new(&Scenario::corridor(), &config(0)).unwrap();
        sim.run(10).unwrap();
        let data = sim.render_data();
        assert_eq!(data.limbs.len(), 6);
        assert!((data.base - sim.body_position()).length() < 1e-4);
    }

    #[test]
    fn test_bad_rig_config_is_error() {
        let mut config = config(0);
        config.run.leg_count = 0;
        assert!(Simulation::new(&Scenario::flat(), &config).is_err());
    }
}
