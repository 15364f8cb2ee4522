//! Driver configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `legwork.ron` file (if exists), or the file given on the command line
//! 3. Environment variables prefixed with `LEGWORK_`
//!
//! Example environment variable: `LEGWORK_LEGS__STEP_DURATION=0.3`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use legwork_limbs::{LegConfig, WanderConfig};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "legwork";

/// Main driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub legs: LegConfig,

    #[serde(default)]
    pub wander: WanderConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// Simulation run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of ticks to simulate
    pub ticks: usize,
    /// Seconds per tick
    pub delta_time: f32,
    /// RNG seed for placement jitter and wandering
    pub seed: u64,
    /// Preset name or path to a scenario file
    pub scenario: String,
    /// Legs of the generated creature
    pub leg_count: usize,
    /// Hip-to-foot length of each generated leg
    pub leg_length: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            delta_time: 1.0 / 60.0,
            seed: 0,
            scenario: "flat".to_string(),
            leg_count: 6,
            leg_length: 2.0,
        }
    }
}

impl AppConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `legwork.ron` in the working directory, or `path` if given
    /// 3. Environment variables prefixed with `LEGWORK_` (highest priority)
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Layer 1: Compiled defaults
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialize default config")?;

        // Layer 2: Config file
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name(CONFIG_FILE)
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            .add_source(defaults)
            .add_source(file)
            // Layer 3: Environment variables (LEGWORK_LEGS__STEP_DURATION, etc.)
            .add_source(Environment::with_prefix("LEGWORK").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        let app: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        self.legs.validate().context("Invalid [legs] section")?;
        self.wander.validate().context("Invalid [wander] section")?;
        anyhow::ensure!(
            self.run.delta_time > 0.0 && self.run.delta_time.is_finite(),
            "run.delta_time must be positive, got {}",
            self.run.delta_time
        );
        anyhow::ensure!(
            self.run.leg_length > 0.0,
            "run.leg_length must be positive, got {}",
            self.run.leg_length
        );
        Ok(())
    }
}
