//! Headless driver for legwork creatures
//!
//! Runs a generated creature through a scenario without any renderer:
//! - `config`: layered driver configuration
//! - `terrain`: axis-aligned wall scene implementing the scene queries
//! - `scenario`: built-in layouts and RON scenario files
//! - `simulation`: the tick loop and its run report

pub mod config;
pub mod scenario;
pub mod simulation;
pub mod terrain;

pub use config::{AppConfig, RunConfig};
pub use scenario::Scenario;
pub use simulation::{RunReport, Simulation};
pub use terrain::{Terrain, Wall};
