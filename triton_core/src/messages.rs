// triton_core/src/messages.rs

use crate::types::Pose2D;
use serde::{Deserialize, Serialize};

// =========================================================================
// == Published Value Types ==
// =========================================================================

/// A single sonar measurement, expressed in the sensor's own frame.
///
/// `range` is always clamped into `[min_range, max_range]`; a reading equal
/// to `max_range` doubles as the "no obstacle detected" sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeReading {
    /// Measured distance in meters.
    pub range: f64,
    pub min_range: f64,
    pub max_range: f64,
    /// Cone aperture of the beam that produced this reading, in radians.
    pub field_of_view: f64,
    /// The frame the reading is reported in; fixed per sensor instance.
    pub frame_id: String,
    /// Time of the scan, in seconds.
    pub timestamp: f64,
}

impl RangeReading {
    /// True when no obstacle was detected within the beam.
    pub fn is_saturated(&self) -> bool {
        self.range >= self.max_range
    }
}

/// A stamped transform from a parent frame to a child frame, published
/// alongside each reading so consumers can place the sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTransform {
    pub parent_frame: String,
    pub child_frame: String,
    pub pose: Pose2D,
    pub timestamp: f64,
}
