// triton_core/src/scan.rs

//! Per-tick orchestration: resolve the robot pose, place the sensor in the
//! world, fire it, and hand the results to the publication collaborators.

use crate::errors::PoseLookupError;
use crate::messages::{FrameTransform, RangeReading};
use crate::sonar::RangeSensor;
use crate::types::Pose2D;
use rand::RngCore;

// =========================================================================
// == Collaborator Contracts ==
// =========================================================================

/// Supplies the robot base pose at a given time. Implemented by the runtime
/// (odometry, transform chain) and mocked in tests. Failure is transient:
/// the scheduler skips the tick and nothing is published.
pub trait PoseSource {
    fn robot_pose(&self, time: f64) -> Result<Pose2D, PoseLookupError>;
}

/// Receives everything a successful tick emits: one reading and one
/// base-to-sensor transform.
pub trait ReadingSink {
    fn publish_reading(&mut self, reading: &RangeReading);
    fn publish_transform(&mut self, transform: &FrameTransform);
}

// =========================================================================
// == Scheduler ==
// =========================================================================

/// Lifecycle of the scheduler: `Idle` until the external timer delivers the
/// first tick, `Active` from then on. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Active,
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Published,
    /// The pose was unresolvable; nothing was published and the previous
    /// reading was not repeated.
    Skipped(PoseLookupError),
}

impl TickOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, TickOutcome::Published)
    }
}

/// Drives one sensor from an external timer. Each tick runs to completion
/// synchronously; ticks either fully succeed (exactly one reading published)
/// or fully no-op.
pub struct ScanScheduler {
    sensor: Box<dyn RangeSensor>,
    base_frame: String,
    rng: Box<dyn RngCore + Send>,
    state: ScanState,
}

impl ScanScheduler {
    pub fn new(
        sensor: Box<dyn RangeSensor>,
        base_frame: impl Into<String>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            sensor,
            base_frame: base_frame.into(),
            rng,
            state: ScanState::Idle,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn sensor(&self) -> &dyn RangeSensor {
        self.sensor.as_ref()
    }

    /// Timer callback. Resolves the robot pose, composes it with the fixed
    /// mounting offset, fires the sensor and publishes the reading plus the
    /// base-to-sensor transform.
    pub fn on_tick(
        &mut self,
        now: f64,
        poses: &dyn PoseSource,
        sink: &mut dyn ReadingSink,
    ) -> TickOutcome {
        self.state = ScanState::Active;

        let base_pose = match poses.robot_pose(now) {
            Ok(pose) => pose,
            Err(err) => return TickOutcome::Skipped(err),
        };

        let mounting = self.sensor.mounting_pose();
        let sensor_world_pose = base_pose.compose(&mounting);
        let reading = self
            .sensor
            .compute_reading(&sensor_world_pose, now, self.rng.as_mut());

        let transform = FrameTransform {
            parent_frame: self.base_frame.clone(),
            child_frame: self.sensor.frame_id().to_string(),
            pose: mounting,
            timestamp: now,
        };

        sink.publish_reading(&reading);
        sink.publish_transform(&transform);
        TickOutcome::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OccupancyGrid;
    use crate::noise::NoNoise;
    use crate::sonar::{Sonar, SonarDescription};
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;

    /// Pose source that fails on scripted tick indices.
    struct FlakyPoseSource {
        pose: Pose2D,
        fail_on: Vec<usize>,
        calls: RefCell<usize>,
    }

    impl FlakyPoseSource {
        fn steady(pose: Pose2D) -> Self {
            Self {
                pose,
                fail_on: Vec::new(),
                calls: RefCell::new(0),
            }
        }

        fn failing_on(pose: Pose2D, fail_on: Vec<usize>) -> Self {
            Self {
                pose,
                fail_on,
                calls: RefCell::new(0),
            }
        }
    }

    impl PoseSource for FlakyPoseSource {
        fn robot_pose(&self, _time: f64) -> Result<Pose2D, PoseLookupError> {
            let call = *self.calls.borrow();
            *self.calls.borrow_mut() += 1;
            if self.fail_on.contains(&call) {
                Err(PoseLookupError::new("base_link", "transform chain broken"))
            } else {
                Ok(self.pose)
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        readings: Vec<RangeReading>,
        transforms: Vec<FrameTransform>,
    }

    impl ReadingSink for Recorder {
        fn publish_reading(&mut self, reading: &RangeReading) {
            self.readings.push(reading.clone());
        }

        fn publish_transform(&mut self, transform: &FrameTransform) {
            self.transforms.push(transform.clone());
        }
    }

    fn test_scheduler() -> ScanScheduler {
        // 10x10 room, wall column at x = 7.
        let mut grid = OccupancyGrid::empty(10, 10, 1.0).unwrap();
        for y in 0..10 {
            grid.occupy(7, y);
        }
        let description = SonarDescription {
            cone_angle: 10.0_f64.to_radians(),
            min_range: 0.1,
            max_range: 8.0,
            mounting: Pose2D::new(0.5, 0.0, 0.0),
            ..Default::default()
        };
        let sonar = Sonar::new(grid.into_snapshot(), description, "front_sonar")
            .unwrap()
            .with_noise(Box::new(NoNoise));
        ScanScheduler::new(
            Box::new(sonar),
            "base_link",
            Box::new(ChaCha8Rng::seed_from_u64(0)),
        )
    }

    #[test]
    fn first_tick_activates_the_scheduler() {
        let mut scheduler = test_scheduler();
        assert_eq!(scheduler.state(), ScanState::Idle);

        let poses = FlakyPoseSource::steady(Pose2D::new(1.5, 5.0, 0.0));
        let mut sink = Recorder::default();
        let outcome = scheduler.on_tick(0.0, &poses, &mut sink);
        assert!(outcome.is_published());
        assert_eq!(scheduler.state(), ScanState::Active);
    }

    #[test]
    fn tick_publishes_reading_and_transform() {
        let mut scheduler = test_scheduler();
        let poses = FlakyPoseSource::steady(Pose2D::new(1.5, 5.0, 0.0));
        let mut sink = Recorder::default();
        scheduler.on_tick(0.25, &poses, &mut sink);

        assert_eq!(sink.readings.len(), 1);
        assert_eq!(sink.transforms.len(), 1);

        // Sensor sits at x = 2.0 after the mounting offset; wall at x = 7.
        let reading = &sink.readings[0];
        assert_abs_diff_eq!(reading.range, 5.0, epsilon = 0.5);
        assert_eq!(reading.frame_id, "front_sonar");
        assert_eq!(reading.timestamp, 0.25);

        let transform = &sink.transforms[0];
        assert_eq!(transform.parent_frame, "base_link");
        assert_eq!(transform.child_frame, "front_sonar");
        assert_eq!(transform.pose, Pose2D::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn pose_failure_skips_the_tick() {
        let mut scheduler = test_scheduler();
        // Fails on tick 3 of 5 (zero-based call index 2).
        let poses =
            FlakyPoseSource::failing_on(Pose2D::new(1.5, 5.0, 0.0), vec![2]);
        let mut sink = Recorder::default();

        let mut published = 0;
        for i in 0..5 {
            if scheduler.on_tick(i as f64 * 0.1, &poses, &mut sink).is_published() {
                published += 1;
            }
        }

        // Exactly 4 publications; the skipped tick republished nothing.
        assert_eq!(published, 4);
        assert_eq!(sink.readings.len(), 4);
        assert_eq!(sink.transforms.len(), 4);
        // All surviving readings agree on the wall distance.
        for reading in &sink.readings {
            assert_abs_diff_eq!(reading.range, 5.0, epsilon = 0.5);
        }
    }

    #[test]
    fn mounting_yaw_rotates_the_beam() {
        // Robot facing +x, sensor mounted looking +y; wall only along the
        // top edge.
        let mut grid = OccupancyGrid::empty(10, 10, 1.0).unwrap();
        for x in 0..10 {
            grid.occupy(x, 9);
        }
        let description = SonarDescription {
            cone_angle: 10.0_f64.to_radians(),
            min_range: 0.1,
            max_range: 9.0,
            mounting: Pose2D::new(0.0, 0.0, std::f64::consts::FRAC_PI_2),
            ..Default::default()
        };
        let sonar = Sonar::new(grid.into_snapshot(), description, "side_sonar")
            .unwrap()
            .with_noise(Box::new(NoNoise));
        let mut scheduler = ScanScheduler::new(
            Box::new(sonar),
            "base_link",
            Box::new(ChaCha8Rng::seed_from_u64(0)),
        );

        let poses = FlakyPoseSource::steady(Pose2D::new(4.5, 2.0, 0.0));
        let mut sink = Recorder::default();
        scheduler.on_tick(0.0, &poses, &mut sink);
        // Wall row starts at y = 9, sensor at y = 2.
        assert_abs_diff_eq!(sink.readings[0].range, 7.0, epsilon = 0.5);
    }
}
