// triton_core/src/sonar.rs

//! Sonar sensor model: a fan of rays across a cone aperture, aggregated to
//! the nearest reflecting surface.

use crate::errors::ConfigError;
use crate::grid::{CellState, MapSnapshot};
use crate::messages::RangeReading;
use crate::noise::{ProportionalNoise, RangeNoise};
use crate::raycast::RayCaster;
use crate::types::Pose2D;
use nalgebra::{UnitComplex, Vector2};
use rand::RngCore;
use std::f64::consts::PI;
use std::fmt::Debug;

/// Configuration of one sonar instance. Immutable after construction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SonarDescription {
    /// Full cone aperture in radians, centered on the sensor's forward axis.
    pub cone_angle: f64,
    /// Lower measurement bound in meters.
    pub min_range: f64,
    /// Upper measurement bound in meters; also the no-detection sentinel.
    pub max_range: f64,
    /// Pose of the sensor relative to the robot base frame.
    pub mounting: Pose2D,
    /// Gain of the default range-proportional noise policy.
    pub noise_gain: f64,
    /// Scan rate in Hz.
    pub frequency: f64,
}

impl Default for SonarDescription {
    fn default() -> Self {
        Self {
            cone_angle: PI / 6.0,
            min_range: 0.2,
            max_range: 4.0,
            mounting: Pose2D::default(),
            noise_gain: 0.0,
            frequency: 10.0,
        }
    }
}

impl SonarDescription {
    /// Checks the description once, at construction. Tick-time code relies
    /// on these bounds and never re-validates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_range >= 0.0 && self.min_range < self.max_range) {
            return Err(ConfigError::InvalidRangeBounds {
                min: self.min_range,
                max: self.max_range,
            });
        }
        if !(self.cone_angle > 0.0) {
            return Err(ConfigError::NonPositiveConeAngle(self.cone_angle));
        }
        if !(self.frequency > 0.0) {
            return Err(ConfigError::NonPositiveFrequency(self.frequency));
        }
        if !(self.noise_gain >= 0.0) {
            return Err(ConfigError::NegativeNoiseGain(self.noise_gain));
        }
        Ok(())
    }

    /// Seconds between scans.
    pub fn update_period(&self) -> f64 {
        1.0 / self.frequency
    }
}

/// One ray of the fan, in the sensor's local frame (+X forward).
#[derive(Debug, Clone)]
pub struct SensorRay {
    pub id: u32,
    /// Unit direction vector.
    pub direction: Vector2<f64>,
}

/// The capability set shared by all range sensors: produce a reading for a
/// world pose, report the mounting pose, report the frame id. Sensor
/// variants implement this trait instead of extending a base class; there is
/// no shared mutable state to inherit.
pub trait RangeSensor: Debug + Send + Sync {
    fn compute_reading(
        &self,
        sensor_world_pose: &Pose2D,
        timestamp: f64,
        rng: &mut dyn RngCore,
    ) -> RangeReading;

    /// Pose of the sensor relative to the robot base.
    fn mounting_pose(&self) -> Pose2D;

    /// The frame readings are reported in. Fixed for the sensor's lifetime.
    fn frame_id(&self) -> &str;

    /// Seconds between scheduled scans.
    fn update_period(&self) -> f64;
}

/// A simulated sonar ranging into a shared occupancy-grid snapshot.
#[derive(Debug, Clone)]
pub struct Sonar {
    description: SonarDescription,
    frame_id: String,
    caster: RayCaster,
    noise: Box<dyn RangeNoise>,
    rays: Vec<SensorRay>,
}

impl Sonar {
    /// Builds a sonar over `map`. Fails fast on an invalid description.
    pub fn new(
        map: MapSnapshot,
        description: SonarDescription,
        frame_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        description.validate()?;
        let rays = ray_fan(&description, map.resolution());
        Ok(Self {
            noise: Box::new(ProportionalNoise::new(description.noise_gain)),
            frame_id: frame_id.into(),
            caster: RayCaster::new(map),
            description,
            rays,
        })
    }

    /// Swaps the measurement-noise policy.
    pub fn with_noise(mut self, noise: Box<dyn RangeNoise>) -> Self {
        self.noise = noise;
        self
    }

    pub fn description(&self) -> &SonarDescription {
        &self.description
    }

    pub fn rays(&self) -> &[SensorRay] {
        &self.rays
    }

    fn reading(&self, range: f64, timestamp: f64) -> RangeReading {
        RangeReading {
            range: range.clamp(self.description.min_range, self.description.max_range),
            min_range: self.description.min_range,
            max_range: self.description.max_range,
            field_of_view: self.description.cone_angle,
            frame_id: self.frame_id.clone(),
            timestamp,
        }
    }
}

impl RangeSensor for Sonar {
    /// Fires the fan from `sensor_world_pose` and reports the nearest hit
    /// across the cone, `max_range` if nothing reflects.
    fn compute_reading(
        &self,
        sensor_world_pose: &Pose2D,
        timestamp: f64,
        rng: &mut dyn RngCore,
    ) -> RangeReading {
        let origin = sensor_world_pose.position();

        // A sensor buried in an obstacle or off the map reads its minimum.
        match self.caster.map().cell_state(&origin) {
            CellState::Occupied | CellState::OutOfBounds => {
                return self.reading(self.description.min_range, timestamp);
            }
            CellState::Free => {}
        }

        let rotation = UnitComplex::new(sensor_world_pose.yaw);
        let mut nearest: Option<f64> = None;
        for ray in &self.rays {
            let world_direction = rotation * ray.direction;
            if let Some(dist) = self
                .caster
                .cast(&origin, &world_direction, self.description.max_range)
            {
                nearest = Some(nearest.map_or(dist, |n: f64| n.min(dist)));
            }
        }

        let range = nearest.unwrap_or(self.description.max_range);
        let noisy = range + self.noise.sample(range, rng);
        self.reading(noisy, timestamp)
    }

    fn mounting_pose(&self) -> Pose2D {
        self.description.mounting
    }

    fn frame_id(&self) -> &str {
        &self.frame_id
    }

    fn update_period(&self) -> f64 {
        self.description.update_period()
    }
}

/// Generates `n` rays evenly spaced across the aperture, `n` chosen so the
/// arc length between adjacent rays at max range is at most one cell width.
/// Aperture endpoints are always sampled.
fn ray_fan(description: &SonarDescription, resolution: f64) -> Vec<SensorRay> {
    let arc = description.cone_angle * description.max_range;
    let n = ((arc / resolution).ceil() as usize + 1).max(3);

    let start = -description.cone_angle / 2.0;
    let increment = description.cone_angle / (n - 1) as f64;
    (0..n)
        .map(|i| {
            let angle = start + i as f64 * increment;
            SensorRay {
                id: i as u32,
                direction: Vector2::new(angle.cos(), angle.sin()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OccupancyGrid;
    use crate::noise::{GaussianNoise, NoNoise};
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0)
    }

    /// 10x10 grid of 1 m cells, all free except cell (5, 5).
    fn single_obstacle_map() -> MapSnapshot {
        let mut grid = OccupancyGrid::empty(10, 10, 1.0).unwrap();
        grid.occupy(5, 5);
        grid.into_snapshot()
    }

    fn quiet_sonar(map: MapSnapshot, description: SonarDescription) -> Sonar {
        Sonar::new(map, description, "sonar_0")
            .unwrap()
            .with_noise(Box::new(NoNoise))
    }

    #[test]
    fn invalid_descriptions_fail_at_construction() {
        let map = single_obstacle_map();
        let bad_bounds = SonarDescription {
            min_range: 3.0,
            max_range: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            Sonar::new(map.clone(), bad_bounds, "s"),
            Err(ConfigError::InvalidRangeBounds { .. })
        ));

        let bad_cone = SonarDescription {
            cone_angle: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            Sonar::new(map.clone(), bad_cone, "s"),
            Err(ConfigError::NonPositiveConeAngle(_))
        ));

        let bad_rate = SonarDescription {
            frequency: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Sonar::new(map, bad_rate, "s"),
            Err(ConfigError::NonPositiveFrequency(_))
        ));
    }

    #[test]
    fn reads_wall_distance_within_one_cell() {
        // Sensor at (0, 5) facing +x, 10 degree cone, 8 m max range; the
        // occupied cell starts 5 m ahead.
        let description = SonarDescription {
            cone_angle: 10.0_f64.to_radians(),
            min_range: 0.1,
            max_range: 8.0,
            ..Default::default()
        };
        let sonar = quiet_sonar(single_obstacle_map(), description);
        let reading =
            sonar.compute_reading(&Pose2D::new(0.0, 5.0, 0.0), 0.0, &mut rng());
        assert_abs_diff_eq!(reading.range, 5.0, epsilon = 0.5);
        assert!(!reading.is_saturated());
    }

    #[test]
    fn empty_map_saturates_exactly_at_max_range() {
        let grid = OccupancyGrid::empty(10, 10, 1.0).unwrap();
        let description = SonarDescription {
            cone_angle: 10.0_f64.to_radians(),
            min_range: 0.1,
            max_range: 5.0,
            ..Default::default()
        };
        let sonar = quiet_sonar(grid.into_snapshot(), description);
        let reading =
            sonar.compute_reading(&Pose2D::new(0.5, 0.5, 0.0), 0.0, &mut rng());
        assert_eq!(reading.range, 5.0);
        assert!(reading.is_saturated());
    }

    #[test]
    fn origin_inside_obstacle_reads_min_range() {
        let description = SonarDescription {
            min_range: 0.3,
            ..Default::default()
        };
        let sonar = quiet_sonar(single_obstacle_map(), description);
        let reading =
            sonar.compute_reading(&Pose2D::new(5.5, 5.5, 0.0), 0.0, &mut rng());
        assert_eq!(reading.range, 0.3);
    }

    #[test]
    fn origin_outside_map_reads_min_range() {
        let description = SonarDescription {
            min_range: 0.3,
            ..Default::default()
        };
        let sonar = quiet_sonar(single_obstacle_map(), description);
        let reading =
            sonar.compute_reading(&Pose2D::new(-3.0, -3.0, 0.0), 0.0, &mut rng());
        assert_eq!(reading.range, 0.3);
    }

    #[test]
    fn reading_is_always_clamped() {
        // An absurd noise gain cannot push the reading out of bounds.
        let description = SonarDescription {
            cone_angle: 10.0_f64.to_radians(),
            min_range: 0.1,
            max_range: 8.0,
            noise_gain: 50.0,
            ..Default::default()
        };
        let sonar = Sonar::new(single_obstacle_map(), description, "sonar_0").unwrap();
        let mut rng = rng();
        for i in 0..200 {
            let reading =
                sonar.compute_reading(&Pose2D::new(0.0, 5.0, 0.0), i as f64, &mut rng);
            assert!(reading.range >= 0.1 && reading.range <= 8.0);
        }
    }

    #[test]
    fn widening_the_cone_never_increases_the_reading() {
        // Obstacle off to the side of the forward axis: narrow cones miss
        // it, wide cones see it.
        let mut grid = OccupancyGrid::empty(12, 12, 1.0).unwrap();
        grid.occupy(6, 8);
        let map = grid.into_snapshot();

        let mut previous = f64::INFINITY;
        for aperture_deg in [5.0f64, 30.0, 90.0, 170.0] {
            let description = SonarDescription {
                cone_angle: aperture_deg.to_radians(),
                min_range: 0.1,
                max_range: 10.0,
                ..Default::default()
            };
            let sonar = quiet_sonar(map.clone(), description);
            let reading =
                sonar.compute_reading(&Pose2D::new(1.5, 5.5, 0.0), 0.0, &mut rng());
            assert!(reading.range <= previous);
            previous = reading.range;
        }
        // The widest cone definitely sees the obstacle.
        assert!(previous < 10.0);
    }

    #[test]
    fn fan_spacing_resolves_one_cell_at_max_range() {
        for (cone_deg, max_range, resolution) in
            [(10.0f64, 8.0, 1.0), (60.0, 5.0, 0.25), (1.0, 4.0, 0.5)]
        {
            let description = SonarDescription {
                cone_angle: cone_deg.to_radians(),
                max_range,
                min_range: 0.05,
                ..Default::default()
            };
            let rays = ray_fan(&description, resolution);
            assert!(rays.len() >= 3);
            let increment = description.cone_angle / (rays.len() - 1) as f64;
            assert!(increment * max_range <= resolution + 1e-9);
        }
    }

    #[test]
    fn gaussian_policy_can_replace_the_default() {
        let description = SonarDescription {
            min_range: 0.1,
            max_range: 8.0,
            ..Default::default()
        };
        let sonar = Sonar::new(single_obstacle_map(), description, "sonar_0")
            .unwrap()
            .with_noise(Box::new(GaussianNoise::new(0.01)));
        let reading =
            sonar.compute_reading(&Pose2D::new(0.0, 5.0, 0.0), 0.0, &mut rng());
        assert!(reading.range >= 0.1 && reading.range <= 8.0);
    }

    #[test]
    fn getters_report_fixed_identity() {
        let description = SonarDescription {
            mounting: Pose2D::new(0.2, -0.1, 0.5),
            ..Default::default()
        };
        let sonar = Sonar::new(single_obstacle_map(), description, "front_sonar").unwrap();
        assert_eq!(sonar.frame_id(), "front_sonar");
        let mount = sonar.mounting_pose();
        assert_eq!((mount.x, mount.y, mount.yaw), (0.2, -0.1, 0.5));
        assert_abs_diff_eq!(sonar.update_period(), 0.1, epsilon = 1e-12);
    }
}
