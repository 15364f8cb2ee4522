//! Placement engine: the per-tick decision loop
//!
//! A tick runs in three phases:
//! 1. **Decide**: every limb works out its target from the scene, reading
//!    other limbs only as they were committed at the end of the previous
//!    tick. Knee clipping is resolved here since it needs the IK solver.
//! 2. **Commit**: decisions are written back, steps and retractions are
//!    started or replaced.
//! 3. **Animate**: every running step, retraction and knee-flip task is
//!    resumed once with the frame's delta time.
//!
//! A limb that fails to find a position never affects the others.

use glam::Vec2;

use crate::animation::StepUpdate;
use crate::config::LegConfig;
use crate::error::RigError;
use crate::limb::Limb;
use crate::neighbor::{self, NeighborSearch};
use crate::probe::ProbeRay;
use crate::render::LimbRenderData;
use crate::rng::PlacementRng;
use crate::traits::{IkSolver, SceneQuery};
use crate::types::{FrameTime, LimbId};

/// Where a limb's target came from this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetSource {
    /// The limb's own ground probe hit
    Ground(Vec2),
    /// No ground; placed in the air within reach
    Floating(Vec2),
    /// Borrowed from another limb
    Neighbor { limb: usize, target: Vec2 },
    /// Nothing usable
    Invalid,
}

/// How knee clipping was handled this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KneeOutcome {
    Clear,
    /// Flipping the bend side cleared the wall
    Flipped,
    /// Both sides clip; target borrowed from a neighbor
    Relocated,
    /// Both sides clip and nobody could lend a target
    Stuck,
}

/// Everything the decide phase worked out for one limb
#[derive(Debug, Clone, Copy, PartialEq)]
struct LimbDecision {
    hip: Vec2,
    /// Hip inside a wall: placement skipped, limb invalid
    hip_blocked: bool,
    source: TargetSource,
    knee: KneeOutcome,
    found_better: bool,
}

impl LimbDecision {
    fn blocked(hip: Vec2) -> Self {
        Self {
            hip,
            hip_blocked: true,
            source: TargetSource::Invalid,
            knee: KneeOutcome::Clear,
            found_better: false,
        }
    }

    fn is_invalid(&self) -> bool {
        self.hip_blocked
            || self.knee == KneeOutcome::Stuck
            || (self.source == TargetSource::Invalid && self.knee != KneeOutcome::Relocated)
    }
}

/// Counters for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub steps_started: usize,
    pub steps_interrupted: usize,
    pub relocations: usize,
    pub knee_flips: usize,
    pub invalid_limbs: usize,
    pub retractions_started: usize,
}

/// Drives foot placement for every limb of one creature
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    limbs: Vec<Limb>,
    config: LegConfig,
}

impl PlacementEngine {
    /// Take ownership of a limb set. Limb ids must match their position.
    pub fn new(limbs: Vec<Limb>, config: LegConfig) -> Result<Self, RigError> {
        config.validate()?;
        if limbs.is_empty() {
            return Err(RigError::EmptyRig);
        }
        debug_assert!(limbs.iter().enumerate().all(|(i, l)| l.id().index() == i));
        Ok(Self { limbs, config })
    }

    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    pub fn limb(&self, id: LimbId) -> Option<&Limb> {
        self.limbs.get(id.index())
    }

    pub fn config(&self) -> &LegConfig {
        &self.config
    }

    /// Mark limbs that can stand on their own as valid before the first
    /// tick, so limbs without ground can borrow from them right away.
    ///
    /// Only validity changes; targets and animators are left alone. Returns
    /// the number of limbs marked valid.
    pub fn prime(&mut self, scene: &impl SceneQuery, ik: &impl IkSolver, rotation: f32) -> usize {
        let layers = self.config.collision_layers;
        let allow_floating = self.config.allow_floating;

        let mut primed = 0;
        for limb in &mut self.limbs {
            let Some(hip) = ik.bone_position(limb.hip()) else {
                continue;
            };
            if scene.overlaps_wall(hip, layers) {
                continue;
            }
            let ray = ProbeRay::for_limb(limb, hip, rotation);
            if allow_floating || ray.cast(scene, layers).is_some() {
                limb.has_no_valid_position = false;
                primed += 1;
            }
        }

        log::debug!("Primed {}/{} limbs", primed, self.limbs.len());
        primed
    }

    /// Advance every limb by one tick.
    ///
    /// `rotation` is the current body rotation in radians.
    pub fn tick(
        &mut self,
        scene: &impl SceneQuery,
        ik: &mut impl IkSolver,
        rng: &mut impl PlacementRng,
        rotation: f32,
        time: FrameTime,
    ) -> TickReport {
        let mut decisions = Vec::with_capacity(self.limbs.len());
        for index in 0..self.limbs.len() {
            decisions.push(self.decide(index, scene, ik, rng, rotation));
        }

        let mut report = TickReport::default();
        for (index, decision) in decisions.into_iter().enumerate() {
            self.commit(index, decision, ik, time, &mut report);
        }

        for limb in &mut self.limbs {
            animate(limb, ik, time.delta_time);
        }

        report
    }

    fn decide(
        &self,
        index: usize,
        scene: &impl SceneQuery,
        ik: &mut impl IkSolver,
        rng: &mut impl PlacementRng,
        rotation: f32,
    ) -> Option<LimbDecision> {
        let limb = &self.limbs[index];
        let layers = self.config.collision_layers;

        let Some(hip) = ik.bone_position(limb.hip()) else {
            log::warn!("{}: hip bone {} has no position", limb.id(), limb.hip());
            return None;
        };

        if scene.overlaps_wall(hip, layers) {
            log::trace!("{}: hip inside wall at ({:.2}, {:.2})", limb.id(), hip.x, hip.y);
            return Some(LimbDecision::blocked(hip));
        }

        let ray = ProbeRay::for_limb(limb, hip, rotation);
        let mut found_better = false;
        let mut source = if let Some(hit) = ray.cast(scene, layers) {
            found_better = !limb.is_in_ideal_position();
            TargetSource::Ground(hit)
        } else if self.config.allow_floating {
            TargetSource::Floating(ray.point_at(self.floating_reach(limb, rng)))
        } else {
            self.borrow_target(index, rng)
        };

        let (knee, relocated_to) = self.resolve_knee(index, hip, scene, ik, rng);
        if let Some(borrowed) = relocated_to {
            source = borrowed;
        }

        Some(LimbDecision {
            hip,
            hip_blocked: false,
            source,
            knee,
            found_better,
        })
    }

    /// Floating distance: interpolate between spacing and full reach, then
    /// jitter by a fraction of what is left of the reach.
    fn floating_reach(&self, limb: &Limb, rng: &mut impl PlacementRng) -> f32 {
        let spacing = limb.spacing_from_base().min(limb.length());
        let base = spacing + (limb.length() - spacing) * limb.floating_distance();
        let spread = (limb.length() - base) * self.config.placement_range;
        let jitter = rng.range_f32(-spread, spread);
        (base + jitter).clamp(spacing, limb.length())
    }

    fn borrow_target(&self, index: usize, rng: &mut impl PlacementRng) -> TargetSource {
        match neighbor::search(&self.limbs, index, self.config.neighbor_policy, rng) {
            NeighborSearch::Found { limb, target } => TargetSource::Neighbor { limb, target },
            NeighborSearch::Exhausted | NeighborSearch::Aborted => TargetSource::Invalid,
        }
    }

    fn knee_clips(
        &self,
        limb: &Limb,
        hip: Vec2,
        scene: &impl SceneQuery,
        ik: &impl IkSolver,
    ) -> bool {
        ik.bone_position(limb.knee()).is_some_and(|knee| {
            scene.segment_hits_wall(hip, knee, self.config.collision_layers)
        })
    }

    /// Check the hip-knee segment against walls, flipping the bend side if
    /// that clears it. Returns a borrowed target when relocation was needed.
    fn resolve_knee(
        &self,
        index: usize,
        hip: Vec2,
        scene: &impl SceneQuery,
        ik: &mut impl IkSolver,
        rng: &mut impl PlacementRng,
    ) -> (KneeOutcome, Option<TargetSource>) {
        let limb = &self.limbs[index];
        let solver = limb.solver();

        if !self.knee_clips(limb, hip, scene, &*ik) {
            return (KneeOutcome::Clear, None);
        }

        let original = ik.flip(solver);
        ik.set_flip(solver, !original);
        ik.force_solve(solver, self.config.solve_strength);
        if !self.knee_clips(limb, hip, scene, &*ik) {
            log::debug!("{}: knee clip resolved by flipping", limb.id());
            return (KneeOutcome::Flipped, None);
        }

        ik.set_flip(solver, original);
        ik.force_solve(solver, self.config.solve_strength);

        match self.borrow_target(index, rng) {
            TargetSource::Invalid => {
                log::debug!("{}: knee stuck in wall on both sides", limb.id());
                (KneeOutcome::Stuck, None)
            }
            borrowed => (KneeOutcome::Relocated, Some(borrowed)),
        }
    }

    fn commit(
        &mut self,
        index: usize,
        decision: Option<LimbDecision>,
        ik: &mut impl IkSolver,
        time: FrameTime,
        report: &mut TickReport,
    ) {
        let config = &self.config;
        let limb = &mut self.limbs[index];

        let Some(decision) = decision else {
            limb.has_no_valid_position = true;
            limb.is_in_ideal_position = false;
            report.invalid_limbs += 1;
            update_retraction(limb, config, report);
            return;
        };

        let invalid = decision.is_invalid();
        limb.has_no_valid_position = invalid;

        if decision.knee == KneeOutcome::Flipped {
            let flipped = ik.flip(limb.solver());
            limb.knee_flip.show(flipped, config.flip_duration);
            report.knee_flips += 1;
        }

        if invalid {
            limb.is_in_ideal_position = false;
            report.invalid_limbs += 1;
        } else {
            let grounded = match decision.source {
                TargetSource::Ground(target) => {
                    limb.target_position = target;
                    limb.is_in_ideal_position = true;
                    true
                }
                TargetSource::Floating(target) => {
                    limb.target_position = target;
                    limb.is_in_ideal_position = true;
                    false
                }
                TargetSource::Neighbor { target, .. } => {
                    limb.target_position = target;
                    limb.is_in_ideal_position = false;
                    true
                }
                TargetSource::Invalid => false,
            };

            let relocated = decision.knee == KneeOutcome::Relocated;
            if relocated {
                report.relocations += 1;
            }

            let lerp_distance = decision.hip.distance(limb.lerp_position);
            let over_extended = lerp_distance > limb.length();
            let too_close = limb.is_floating && lerp_distance < limb.spacing_from_base();

            if over_extended {
                request_step(limb, ik, config, grounded, true, time, report);
            } else if too_close || relocated || decision.found_better {
                request_step(limb, ik, config, grounded, false, time, report);
            }
        }

        // Hold the foot still between steps so the solver cannot drift it
        if !decision.hip_blocked && !limb.is_stepping() {
            ik.set_target(limb.solver(), limb.lerp_position);
        }

        update_retraction(limb, config, report);
    }

    /// Render-facing snapshot of every limb
    pub fn render_data(&self, ik: &mut impl IkSolver) -> Vec<LimbRenderData> {
        let mut data = Vec::with_capacity(self.limbs.len());
        for limb in &self.limbs {
            if let Some(render) = LimbRenderData::capture(limb, ik) {
                data.push(render);
            }
        }
        data
    }
}

/// Point the limb at its target and start a step toward it.
///
/// A step already in flight is only replaced when `interrupt` is set and the
/// destination actually moved; otherwise the new lerp position is picked up
/// by the running step.
fn request_step(
    limb: &mut Limb,
    ik: &mut impl IkSolver,
    config: &LegConfig,
    grounded: bool,
    interrupt: bool,
    time: FrameTime,
    report: &mut TickReport,
) {
    let destination_moved = limb.lerp_position != limb.target_position;
    limb.lerp_position = limb.target_position;
    limb.lerp_grounded = grounded;

    if limb.is_stepping() && !(interrupt && destination_moved) {
        return;
    }

    let from = ik.target(limb.solver());
    let interrupted = limb
        .step
        .start(from, config.step_duration, config.step_easing);
    limb.last_step_at = Some(time.now);
    report.steps_started += 1;
    if interrupted {
        report.steps_interrupted += 1;
    }

    log::trace!(
        "{}: step from ({:.2}, {:.2}) to ({:.2}, {:.2}){}",
        limb.id(),
        from.x,
        from.y,
        limb.lerp_position.x,
        limb.lerp_position.y,
        if interrupted { " (interrupting)" } else { "" }
    );
}

fn update_retraction(limb: &mut Limb, config: &LegConfig, report: &mut TickReport) {
    if limb.has_no_valid_position {
        if !limb.retraction.is_retracting() && !limb.retraction.is_fully_retracted() {
            limb.retraction.start(1.0, config.retract_duration);
            report.retractions_started += 1;
            log::trace!("{}: retracting", limb.id());
        }
    } else if !limb.retraction.is_extending() && !limb.retraction.is_fully_deployed() {
        limb.retraction.start(0.0, config.retract_duration);
        log::trace!("{}: extending", limb.id());
    }
}

fn animate(limb: &mut Limb, ik: &mut impl IkSolver, dt: f32) {
    match limb.step.advance(dt, limb.lerp_position) {
        StepUpdate::Idle => {}
        StepUpdate::Moving(position) => ik.set_target(limb.solver(), position),
        StepUpdate::Landed(position) => {
            ik.set_target(limb.solver(), position);
            limb.is_floating = !limb.lerp_grounded;
        }
    }
    limb.retraction.advance(dt);
    limb.knee_flip.advance(dt);
}
