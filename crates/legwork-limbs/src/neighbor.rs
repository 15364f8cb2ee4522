//! Neighbor search
//!
//! When a limb cannot find a foothold of its own it borrows the target of
//! another limb. Limbs form a fixed ring ordered by id; the scan walks the
//! ring in both directions at once, one step clockwise then one step
//! counter-clockwise, until both directions run into limbs already seen.

use glam::Vec2;

use crate::config::NeighborPolicy;
use crate::limb::Limb;
use crate::rng::PlacementRng;

/// Hard cap on scan iterations. Only a broken ring can reach it.
pub const MAX_SEARCH_ITERATIONS: usize = 100;

/// What the scan needs to know about a limb
pub trait NeighborCandidate {
    /// The limb currently has a usable target
    fn is_valid(&self) -> bool;

    /// Target another limb may borrow
    fn borrowable_target(&self) -> Vec2;
}

impl NeighborCandidate for Limb {
    fn is_valid(&self) -> bool {
        !self.has_no_valid_position()
    }

    fn borrowable_target(&self) -> Vec2 {
        self.target_position()
    }
}

/// Outcome of a neighbor scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeighborSearch {
    Found { limb: usize, target: Vec2 },
    /// Both directions looped without meeting a valid limb
    Exhausted,
    /// The iteration cap was hit before both directions looped
    Aborted,
}

impl NeighborSearch {
    pub fn target(&self) -> Option<Vec2> {
        match self {
            NeighborSearch::Found { target, .. } => Some(*target),
            _ => None,
        }
    }
}

/// One direction of the ring walk
struct Walker {
    cursor: usize,
    clockwise: bool,
    looped: bool,
}

impl Walker {
    fn new(origin: usize, clockwise: bool) -> Self {
        Self {
            cursor: origin,
            clockwise,
            looped: false,
        }
    }

    /// Step once and return the newly visited index, or `None` once looped
    fn visit(&mut self, len: usize, seen: &mut [bool]) -> Option<usize> {
        if self.looped {
            return None;
        }

        self.cursor = if self.clockwise {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };

        if seen[self.cursor] {
            self.looped = true;
            return None;
        }
        seen[self.cursor] = true;
        Some(self.cursor)
    }
}

/// Scan the ring around `origin` for a limb to borrow a target from.
///
/// `candidates` must be the limb set in id order. Only reads it.
pub fn search<C: NeighborCandidate>(
    candidates: &[C],
    origin: usize,
    policy: NeighborPolicy,
    rng: &mut impl PlacementRng,
) -> NeighborSearch {
    let len = candidates.len();
    if origin >= len {
        return NeighborSearch::Exhausted;
    }

    let mut seen = vec![false; len];
    seen[origin] = true;

    let mut clockwise = Walker::new(origin, true);
    let mut counter_clockwise = Walker::new(origin, false);
    let mut valid: Vec<usize> = Vec::new();

    for _ in 0..MAX_SEARCH_ITERATIONS {
        if clockwise.looped && counter_clockwise.looped {
            return pick(candidates, &valid, rng);
        }

        for walker in [&mut clockwise, &mut counter_clockwise] {
            let Some(index) = walker.visit(len, &mut seen) else {
                continue;
            };
            if !candidates[index].is_valid() {
                continue;
            }
            match policy {
                NeighborPolicy::NearestFirst => {
                    return NeighborSearch::Found {
                        limb: index,
                        target: candidates[index].borrowable_target(),
                    };
                }
                NeighborPolicy::RandomValid => valid.push(index),
            }
        }
    }

    if clockwise.looped && counter_clockwise.looped {
        return pick(candidates, &valid, rng);
    }

    log::error!(
        "Neighbor search from limb {} gave up after {} iterations ({} limbs)",
        origin,
        MAX_SEARCH_ITERATIONS,
        len
    );
    NeighborSearch::Aborted
}

fn pick<C: NeighborCandidate>(
    candidates: &[C],
    valid: &[usize],
    rng: &mut impl PlacementRng,
) -> NeighborSearch {
    if valid.is_empty() {
        return NeighborSearch::Exhausted;
    }
    let limb = valid[rng.index(valid.len())];
    NeighborSearch::Found {
        limb,
        target: candidates[limb].borrowable_target(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[derive(Clone, Copy)]
    struct Candidate {
        valid: bool,
        target: Vec2,
    }

    impl NeighborCandidate for Candidate {
        fn is_valid(&self) -> bool {
            self.valid
        }

        fn borrowable_target(&self) -> Vec2 {
            self.target
        }
    }

    fn ring(valid: &[bool]) -> Vec<Candidate> {
        valid
            .iter()
            .enumerate()
            .map(|(i, &valid)| Candidate {
                valid,
                target: Vec2::new(i as f32, 0.0),
            })
            .collect()
    }

    fn rng() -> Xoshiro256StarStar {
        Xoshiro256StarStar::seed_from_u64(7)
    }

    #[test]
    fn test_nearest_clockwise_wins() {
        let limbs = ring(&[false, true, false, true, false, true]);
        let result = search(&limbs, 0, NeighborPolicy::NearestFirst, &mut rng());
        assert_eq!(
            result,
            NeighborSearch::Found {
                limb: 1,
                target: Vec2::new(1.0, 0.0)
            }
        );
    }

    #[test]
    fn test_counter_clockwise_when_clockwise_invalid() {
        let limbs = ring(&[false, false, false, false, false, true]);
        let result = search(&limbs, 0, NeighborPolicy::NearestFirst, &mut rng());
        assert_eq!(result.target(), Some(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_wraps_around_the_ring() {
        let limbs = ring(&[true, false, false, false, false, false]);
        let result = search(&limbs, 4, NeighborPolicy::NearestFirst, &mut rng());
        assert_eq!(result.target(), Some(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_all_invalid_is_exhausted() {
        let limbs = ring(&[false; 6]);
        let result = search(&limbs, 0, NeighborPolicy::NearestFirst, &mut rng());
        assert_eq!(result, NeighborSearch::Exhausted);
    }

    #[test]
    fn test_single_limb_never_borrows_itself() {
        let limbs = ring(&[true]);
        let result = search(&limbs, 0, NeighborPolicy::NearestFirst, &mut rng());
        assert_eq!(result, NeighborSearch::Exhausted);
    }

    #[test]
    fn test_origin_out_of_range() {
        let limbs = ring(&[true, true]);
        let result = search(&limbs, 5, NeighborPolicy::NearestFirst, &mut rng());
        assert_eq!(result, NeighborSearch::Exhausted);
    }

    #[test]
    fn test_random_policy_only_picks_valid() {
        let limbs = ring(&[false, true, false, true, false, true]);
        let mut rng = rng();
        for _ in 0..50 {
            match search(&limbs, 0, NeighborPolicy::RandomValid, &mut rng) {
                NeighborSearch::Found { limb, .. } => assert!(limb % 2 == 1),
                other => panic!("expected a valid limb, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_huge_ring_hits_iteration_cap() {
        let limbs = ring(&vec![false; 500]);
        let result = search(&limbs, 0, NeighborPolicy::NearestFirst, &mut rng());
        assert_eq!(result, NeighborSearch::Aborted);
    }
}
