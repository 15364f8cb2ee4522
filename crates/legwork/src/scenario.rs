//! Scenario presets and RON scenario files
//!
//! A scenario is a terrain plus where the creature starts and where it
//! wanders to. The presets exercise the different placement paths: plain
//! ground, low ceilings, holes too wide to bridge and walls close enough to
//! catch knees.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::terrain::{Terrain, Wall};
use legwork_limbs::CollisionLayers;

/// Names accepted by [`Scenario::preset`]
pub const PRESETS: &[&str] = &["flat", "corridor", "pit", "cage"];

/// Half-width of the preset worlds
const WORLD_EXTENT: f32 = 50.0;

/// A terrain layout with a spawn point and a wander goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Body position on the first tick
    pub spawn: Vec2,
    /// Where the body wanders to
    pub goal: Vec2,
    pub walls: Vec<Wall>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::flat()
    }
}

fn ground(from: f32, to: f32) -> Wall {
    Wall::new(Vec2::new(from, -5.0), Vec2::new(to, 0.0))
}

impl Scenario {
    /// Open ground, walking to the right
    pub fn flat() -> Self {
        Self {
            name: "flat".to_string(),
            description: "Flat ground plane".to_string(),
            spawn: Vec2::new(0.0, 1.0),
            goal: Vec2::new(20.0, 1.0),
            walls: vec![ground(-WORLD_EXTENT, WORLD_EXTENT)],
        }
    }

    /// Floor and a low ceiling the upper legs can reach
    pub fn corridor() -> Self {
        Self {
            name: "corridor".to_string(),
            description: "Floor with a ceiling within leg reach".to_string(),
            spawn: Vec2::new(0.0, 1.25),
            goal: Vec2::new(20.0, 1.25),
            walls: vec![
                ground(-WORLD_EXTENT, WORLD_EXTENT),
                Wall::new(Vec2::new(-WORLD_EXTENT, 2.5), Vec2::new(WORLD_EXTENT, 5.0)),
            ],
        }
    }

    /// Ground with a hole wider than a leg; legs over it retract
    pub fn pit() -> Self {
        Self {
            name: "pit".to_string(),
            description: "Ground with a gap wider than a leg".to_string(),
            spawn: Vec2::new(0.0, 1.0),
            goal: Vec2::new(14.0, 1.0),
            walls: vec![
                ground(-WORLD_EXTENT, 4.0),
                ground(9.0, WORLD_EXTENT),
                Wall::new(Vec2::new(4.0, -25.0), Vec2::new(9.0, -20.0)),
            ],
        }
    }

    /// Body boxed in by walls close enough to catch the knees
    pub fn cage() -> Self {
        let wall = CollisionLayers::WALL;
        Self {
            name: "cage".to_string(),
            description: "Enclosure with walls inside knee reach".to_string(),
            spawn: Vec2::new(0.0, 1.0),
            goal: Vec2::new(0.5, 1.0),
            walls: vec![
                ground(-WORLD_EXTENT, WORLD_EXTENT),
                Wall::new(Vec2::new(-1.6, 0.0), Vec2::new(-1.2, 2.4)).with_layers(wall),
                Wall::new(Vec2::new(1.2, 0.0), Vec2::new(1.6, 2.4)).with_layers(wall),
                Wall::new(Vec2::new(-1.6, 1.6), Vec2::new(1.6, 2.4)).with_layers(wall),
            ],
        }
    }

    /// Look up a preset by name (case-insensitive)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "flat" => Some(Self::flat()),
            "corridor" => Some(Self::corridor()),
            "pit" => Some(Self::pit()),
            "cage" => Some(Self::cage()),
            _ => None,
        }
    }

    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).context("Failed to parse scenario")
    }

    /// Load a scenario from a `.ron` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::from_ron_str(&source).with_context(|| format!("In scenario file {}", path.display()))
    }

    /// A preset name, or otherwise a path to a scenario file
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if let Some(scenario) = Self::preset(name_or_path) {
            return Ok(scenario);
        }
        Self::load(name_or_path).with_context(|| {
            format!(
                "'{}' is neither a preset ({}) nor a readable scenario file",
                name_or_path,
                PRESETS.join(", ")
            )
        })
    }

    pub fn terrain(&self) -> Terrain {
        Terrain::new(self.walls.clone())
    }
}

/// Print the available presets
pub fn list_presets() {
    println!("Available scenarios:");
    for name in PRESETS {
        if let Some(scenario) = Scenario::preset(name) {
            println!("  {:<10} {}", scenario.name, scenario.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legwork_limbs::SceneQuery;
    use std::io::Write;

    #[test]
    fn test_every_preset_resolves() {
        for name in PRESETS {
            let scenario = Scenario::preset(name).unwrap();
            assert_eq!(&scenario.name, name);
            assert!(!scenario.walls.is_empty());
        }
        assert!(Scenario::preset("FLAT").is_some());
        assert!(Scenario::preset("moon").is_none());
    }

    #[test]
    fn test_spawn_is_clear_of_walls() {
        let layers = CollisionLayers::GROUND | CollisionLayers::WALL;
        for name in PRESETS {
            let scenario = Scenario::preset(name).unwrap();
            let terrain = scenario.terrain();
            assert!(!terrain.overlaps_wall(scenario.spawn, layers), "{}", name);
        }
    }

    #[test]
    fn test_pit_has_no_ground_in_reach() {
        let terrain = Scenario::pit().terrain();
        let layers = CollisionLayers::GROUND;
        let down = Vec2::new(0.0, -1.0);
        assert!(terrain.raycast(Vec2::new(6.5, 1.0), down, 2.0, layers).is_none());
        assert!(terrain.raycast(Vec2::new(0.0, 1.0), down, 2.0, layers).is_some());
    }

    #[test]
    fn test_parse_ron_scenario() {
        let source = r#"(
            name: "ledge",
            spawn: (0.0, 1.0),
            goal: (5.0, 1.0),
            walls: [
                (min: (-10.0, -1.0), max: (2.0, 0.0)),
                (min: (3.0, 0.0), max: (4.0, 3.0), layers: "WALL"),
            ],
        )"#;
        let scenario = Scenario::from_ron_str(source).unwrap();
        assert_eq!(scenario.name, "ledge");
        assert_eq!(scenario.description, "");
        assert_eq!(scenario.walls.len(), 2);
        assert_eq!(scenario.walls[0].layers, CollisionLayers::GROUND);
        assert_eq!(scenario.walls[1].layers, CollisionLayers::WALL);
    }

    #[test]
    fn test_resolve_loads_file() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        write!(
            file,
            r#"(name: "file", spawn: (0.0, 1.0), goal: (1.0, 1.0), walls: [])"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let scenario = Scenario::resolve(&path).unwrap();
        assert_eq!(scenario.name, "file");
    }

    #[test]
    fn test_resolve_unknown_is_error() {
        let err = Scenario::resolve("no-such-scenario").unwrap_err();
        assert!(format!("{:#}", err).contains("neither a preset"));
    }
}
