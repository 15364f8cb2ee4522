//! RNG abstraction for foot placement
//!
//! Placement jitter and random neighbor selection draw from an injected
//! source so a seeded generator reproduces a run exactly.

/// Random number source used by the placement engine
pub trait PlacementRng {
    /// Uniform real in `[min, max)`; returns `min` for an empty range
    fn range_f32(&mut self, min: f32, max: f32) -> f32;

    /// Uniform index in `[0, len)`; returns 0 when `len <= 1`
    fn index(&mut self, len: usize) -> usize;
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> PlacementRng for T {
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.gen_range(min..max)
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.gen_range(0..len)
    }
}
