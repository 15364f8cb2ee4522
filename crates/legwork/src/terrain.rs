//! Axis-aligned wall terrain
//!
//! The headless scene: a list of solid boxes, each on one or more collision
//! layers. Ground is just a wide box whose top face the feet probe for.

use glam::Vec2;
use legwork_limbs::{CollisionLayers, SceneQuery};
use serde::{Deserialize, Serialize};

fn default_layers() -> CollisionLayers {
    CollisionLayers::GROUND
}

/// A solid box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub min: Vec2,
    pub max: Vec2,
    #[serde(default = "default_layers")]
    pub layers: CollisionLayers,
}

impl Wall {
    /// Box spanning two corners in any order, on the ground layer
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            layers: default_layers(),
        }
    }

    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Inclusive: points on the boundary are inside
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Parametric range `[t_enter, t_exit]` where `origin + direction * t`
    /// is inside the box, clipped to `[t_min, t_max]`.
    ///
    /// Slab test per axis (Liang–Barsky when the range is `[0, 1]`).
    fn clip(&self, origin: Vec2, direction: Vec2, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        let mut enter = t_min;
        let mut exit = t_max;

        for axis in 0..2 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() <= f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            enter = enter.max(t1.min(t2));
            exit = exit.min(t1.max(t2));
            if enter > exit {
                return None;
            }
        }

        Some((enter, exit))
    }
}

/// Static scene made of walls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    walls: Vec<Wall>,
}

impl Terrain {
    pub fn new(walls: Vec<Wall>) -> Self {
        Self { walls }
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    fn on_layers(&self, layers: CollisionLayers) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(move |w| w.layers.intersects(layers))
    }
}

impl SceneQuery for Terrain {
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<Vec2> {
        let direction = direction.try_normalize()?;

        self.on_layers(layers)
            .filter_map(|wall| wall.clip(origin, direction, 0.0, max_distance))
            .map(|(enter, _)| enter)
            .min_by(|a, b| a.total_cmp(b))
            .map(|t| origin + direction * t)
    }

    fn segment_hits_wall(&self, a: Vec2, b: Vec2, layers: CollisionLayers) -> bool {
        self.on_layers(layers)
            .any(|wall| wall.clip(a, b - a, 0.0, 1.0).is_some())
    }

    fn overlaps_wall(&self, point: Vec2, layers: CollisionLayers) -> bool {
        self.on_layers(layers).any(|wall| wall.contains(point))
    }
}
