// triton_sim/src/config.rs

//! Loading and validating scenario configuration from TOML.

use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use triton_core::errors::ConfigError;
use triton_core::grid::{MapSnapshot, OccupancyGrid};
use triton_core::sonar::SonarDescription;
use triton_core::types::Pose2D;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to load scenario '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Loads a scenario file from disk.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, ScenarioError> {
    Figment::new()
        .merge(Toml::file(path))
        .extract()
        .map_err(|e| ScenarioError::Load {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
}

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// The root of the data parsed from a scenario TOML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: SimulationSection,

    pub world: WorldSection,

    // The TOML has `[[robots]]`, which becomes a Vec of RobotConfig structs.
    #[serde(default)]
    pub robots: Vec<RobotConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    /// Optional seed for the pseudo-random number generator for determinism.
    pub seed: Option<u64>,
    /// Duration of the simulation in seconds.
    pub duration_seconds: f64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            seed: None,
            duration_seconds: 10.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldSection {
    /// Length of one grid cell in meters.
    pub resolution: f64,

    /// Occupancy value at which a cell counts as occupied.
    #[serde(default = "default_occupied_threshold")]
    pub occupied_threshold: u8,

    /// ASCII map, top row first: `#` occupied, `?` unknown, anything else
    /// free.
    pub rows: Vec<String>,

    /// World pose of the grid's (0, 0) cell corner.
    #[serde(default)]
    pub origin: PoseSection,
}

fn default_occupied_threshold() -> u8 {
    50
}

impl WorldSection {
    pub fn build_map(&self) -> Result<MapSnapshot, ConfigError> {
        Ok(OccupancyGrid::from_ascii(&self.rows, self.resolution)?
            .with_origin(self.origin.to_pose())
            .with_occupied_threshold(self.occupied_threshold)
            .into_snapshot())
    }
}

// =========================================================================
// == Helper Structs for Nested Configuration ==
// =========================================================================

/// A pose in the TOML, with the yaw in degrees for readability.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct PoseSection {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub yaw_deg: f64,
}

impl PoseSection {
    pub fn to_pose(&self) -> Pose2D {
        Pose2D::new(self.x, self.y, self.yaw_deg.to_radians())
    }
}

/// Constant twist applied to a robot for the whole run.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct VelocitySection {
    /// Forward speed in m/s.
    #[serde(default)]
    pub linear: f64,
    /// Turn rate in deg/s.
    #[serde(default)]
    pub angular_deg: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RobotConfig {
    pub name: String,
    #[serde(default)]
    pub starting_pose: PoseSection,
    #[serde(default)]
    pub velocity: VelocitySection,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

// =========================================================================
// == Sensors ==
// =========================================================================

// This enum can represent ANY sensor that might appear in the config list.
// The `tag = "kind"` tells Serde to look for a `kind = "..."` field in the
// TOML to decide which variant to parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
#[serde(rename_all = "PascalCase")]
pub enum SensorConfig {
    Sonar(SonarConfig),
    // When you add a laser, you'll add a new variant here:
    // Laser(LaserConfig),
}

impl SensorConfig {
    pub fn get_name(&self) -> &str {
        match self {
            SensorConfig::Sonar(c) => &c.name,
        }
    }

    pub fn get_rate(&self) -> f64 {
        match self {
            SensorConfig::Sonar(c) => c.rate,
        }
    }
}

/// Configuration parameters for a simulated sonar.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SonarConfig {
    /// A unique name for this sensor instance (e.g., "front_sonar").
    pub name: String,

    /// The rate at which the sonar produces readings, in Hz.
    pub rate: f64,

    /// The static pose of the sonar relative to the robot base.
    #[serde(default)]
    pub mounting: PoseSection,

    /// Full cone aperture, in degrees.
    pub cone_angle_deg: f64,

    pub min_range: f64,
    pub max_range: f64,

    /// Gain of the range-proportional measurement noise.
    #[serde(default)]
    pub noise_gain: f64,
}

impl SonarConfig {
    pub fn to_description(&self) -> SonarDescription {
        SonarDescription {
            cone_angle: self.cone_angle_deg.to_radians(),
            min_range: self.min_range,
            max_range: self.max_range,
            mounting: self.mounting.to_pose(),
            noise_gain: self.noise_gain,
            frequency: self.rate,
        }
    }
}
