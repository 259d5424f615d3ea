// triton_core/src/raycast.rs

//! Fixed-increment ray marching through an occupancy grid.

use crate::grid::{CellState, MapSnapshot};
use nalgebra::{Point2, Vector2};

/// Step size as a fraction of the cell resolution. Must stay at or below
/// one cell so the march cannot jump over an occupied cell.
const STEP_CELL_FRACTION: f64 = 0.5;

/// Casts rays through a shared grid snapshot.
///
/// The march is fully deterministic: identical origin, direction and map
/// produce bit-for-bit identical results on every invocation.
#[derive(Debug, Clone)]
pub struct RayCaster {
    map: MapSnapshot,
    step: f64,
}

impl RayCaster {
    pub fn new(map: MapSnapshot) -> Self {
        let step = map.resolution() * STEP_CELL_FRACTION;
        Self { map, step }
    }

    pub fn map(&self) -> &MapSnapshot {
        &self.map
    }

    /// Distance increment between successive cell queries.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Marches from `origin` along `direction` and returns the travelled
    /// distance at the first occupied cell, or `None` if `max_range` is
    /// reached without a hit.
    ///
    /// Out-of-bounds samples scan as free: the ray keeps marching, since a
    /// map whose origin lies ahead of the sensor can still be entered.
    pub fn cast(
        &self,
        origin: &Point2<f64>,
        direction: &Vector2<f64>,
        max_range: f64,
    ) -> Option<f64> {
        let norm = direction.norm();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        let dir = direction / norm;

        let mut travelled = 0.0;
        while travelled <= max_range {
            let sample = origin + dir * travelled;
            if self.map.cell_state(&sample) == CellState::Occupied {
                return Some(travelled);
            }
            travelled += self.step;
        }
        None
    }
}
