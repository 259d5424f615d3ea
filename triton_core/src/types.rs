// triton_core/src/types.rs

use nalgebra::{Isometry2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A planar pose: position plus heading, in whichever frame the context
/// dictates. Used for the robot base pose, the fixed sensor mounting offset,
/// and the composed sensor world pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, measured counter-clockwise from +X.
    pub yaw: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    /// Composes this pose with a child pose expressed in this pose's frame.
    ///
    /// `robot_world.compose(&sensor_mounting)` yields the sensor's world
    /// pose: the child translation is rotated by the parent yaw, offsets are
    /// added, and the yaws sum.
    pub fn compose(&self, child: &Pose2D) -> Pose2D {
        Pose2D::from_isometry(&(self.to_isometry() * child.to_isometry()))
    }

    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.x, self.y), self.yaw)
    }

    pub fn from_isometry(iso: &Isometry2<f64>) -> Self {
        Self {
            x: iso.translation.vector.x,
            y: iso.translation.vector.y,
            yaw: normalize_angle(iso.rotation.angle()),
        }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// The unit vector this pose is facing along.
    pub fn heading(&self) -> Vector2<f64> {
        Vector2::new(self.yaw.cos(), self.yaw.sin())
    }
}

/// Wraps an angle into (-PI, PI].
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}
