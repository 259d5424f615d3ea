// triton_sim/src/sinks.rs

//! Publication collaborators: where readings and transforms go after a
//! successful tick.

use triton_core::messages::{FrameTransform, RangeReading};
use triton_core::scan::ReadingSink;

/// Logs every publication through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReadingSink for LogSink {
    fn publish_reading(&mut self, reading: &RangeReading) {
        log::info!(
            "[{}] range {:.3} m at t={:.3}s{}",
            reading.frame_id,
            reading.range,
            reading.timestamp,
            if reading.is_saturated() { " (no echo)" } else { "" }
        );
    }

    fn publish_transform(&mut self, transform: &FrameTransform) {
        log::debug!(
            "{} -> {}: ({:.3}, {:.3}, yaw {:.3})",
            transform.parent_frame,
            transform.child_frame,
            transform.pose.x,
            transform.pose.y,
            transform.pose.yaw
        );
    }
}

/// Retains everything published; the test observer and the source of the
/// end-of-run summary.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub readings: Vec<RangeReading>,
    pub transforms: Vec<FrameTransform>,
}

impl ReadingSink for RecordingSink {
    fn publish_reading(&mut self, reading: &RangeReading) {
        self.readings.push(reading.clone());
    }

    fn publish_transform(&mut self, transform: &FrameTransform) {
        self.transforms.push(transform.clone());
    }
}

/// Forwards each publication to two sinks, e.g. a logger plus a recorder.
pub struct TeeSink<'a> {
    first: &'a mut dyn ReadingSink,
    second: &'a mut dyn ReadingSink,
}

impl<'a> TeeSink<'a> {
    pub fn new(first: &'a mut dyn ReadingSink, second: &'a mut dyn ReadingSink) -> Self {
        Self { first, second }
    }
}

impl ReadingSink for TeeSink<'_> {
    fn publish_reading(&mut self, reading: &RangeReading) {
        self.first.publish_reading(reading);
        self.second.publish_reading(reading);
    }

    fn publish_transform(&mut self, transform: &FrameTransform) {
        self.first.publish_transform(transform);
        self.second.publish_transform(transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> RangeReading {
        RangeReading {
            range: 1.5,
            min_range: 0.1,
            max_range: 4.0,
            field_of_view: 0.5,
            frame_id: "front_sonar".into(),
            timestamp: 0.25,
        }
    }

    #[test]
    fn recorder_retains_publications() {
        let mut sink = RecordingSink::default();
        sink.publish_reading(&reading());
        sink.publish_reading(&reading());
        assert_eq!(sink.readings.len(), 2);
        assert!(sink.transforms.is_empty());
    }

    #[test]
    fn tee_forwards_to_both_sinks() {
        let mut a = RecordingSink::default();
        let mut b = RecordingSink::default();
        {
            let mut tee = TeeSink::new(&mut a, &mut b);
            tee.publish_reading(&reading());
        }
        assert_eq!(a.readings.len(), 1);
        assert_eq!(b.readings.len(), 1);
    }
}
