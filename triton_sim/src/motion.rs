// triton_sim/src/motion.rs

use triton_core::errors::PoseLookupError;
use triton_core::scan::PoseSource;
use triton_core::types::{normalize_angle, Pose2D};

/// Turn rates below this are integrated as straight-line motion.
const STRAIGHT_LINE_EPS: f64 = 1e-9;

/// Closed-form unicycle motion: a constant twist applied from a starting
/// pose. Serves as the pose-source collaborator for simulated robots; the
/// pose is always resolvable.
#[derive(Debug, Clone)]
pub struct KinematicPoseSource {
    initial: Pose2D,
    /// Forward speed in m/s.
    linear: f64,
    /// Turn rate in rad/s.
    angular: f64,
}

impl KinematicPoseSource {
    pub fn new(initial: Pose2D, linear: f64, angular: f64) -> Self {
        Self {
            initial,
            linear,
            angular,
        }
    }

    fn pose_at(&self, t: f64) -> Pose2D {
        let Pose2D { x, y, yaw } = self.initial;
        if self.angular.abs() < STRAIGHT_LINE_EPS {
            return Pose2D::new(
                x + self.linear * t * yaw.cos(),
                y + self.linear * t * yaw.sin(),
                yaw,
            );
        }
        // Arc of radius v/w.
        let radius = self.linear / self.angular;
        let heading = yaw + self.angular * t;
        Pose2D::new(
            x + radius * (heading.sin() - yaw.sin()),
            y - radius * (heading.cos() - yaw.cos()),
            normalize_angle(heading),
        )
    }
}

impl PoseSource for KinematicPoseSource {
    fn robot_pose(&self, time: f64) -> Result<Pose2D, PoseLookupError> {
        Ok(self.pose_at(time))
    }
}
