// triton_core/src/grid.rs

//! Read-only occupancy-grid view used by the ray caster.

use crate::errors::ConfigError;
use crate::types::Pose2D;
use nalgebra::{DMatrix, Point2};
use std::sync::Arc;

/// Cell value marking unmapped space. Unknown cells return no echo, so the
/// ray caster treats them like free space.
pub const UNKNOWN_CELL: u8 = 255;

/// Cell value for a fully occupied cell.
pub const OCCUPIED_CELL: u8 = 100;

fn default_occupied_threshold() -> u8 {
    50
}

/// Classification of a world coordinate against the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Free,
    Occupied,
    /// Outside the grid extent. Callers treat this like free space: the ray
    /// continues and the reading saturates at max range.
    OutOfBounds,
}

/// An immutable snapshot of a 2D occupancy grid.
///
/// Cells hold occupancy percentages in 0..=100 (`UNKNOWN_CELL` marks
/// unmapped space); a cell counts as occupied once its value reaches the
/// configured threshold. Mutators are only available before the grid is
/// frozen into a [`MapSnapshot`], so ray casting can never observe a torn
/// update.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    resolution: f64,
    width: usize,
    height: usize,
    origin: Pose2D,
    occupied_threshold: u8,
    // Row index is the cell y coordinate, column index the cell x.
    data: DMatrix<u8>,
}

/// Shared, reference-counted handle to a frozen grid. Several sensors hold
/// clones of the same snapshot; swapping in a new map is an `Arc` swap and
/// never tears a scan in progress.
pub type MapSnapshot = Arc<OccupancyGrid>;

impl OccupancyGrid {
    /// Creates an all-free grid of `width` x `height` cells.
    pub fn empty(width: usize, height: usize, resolution: f64) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if resolution <= 0.0 || !resolution.is_finite() {
            return Err(ConfigError::NonPositiveResolution(resolution));
        }
        Ok(Self {
            resolution,
            width,
            height,
            origin: Pose2D::default(),
            occupied_threshold: default_occupied_threshold(),
            data: DMatrix::from_element(height, width, 0),
        })
    }

    /// Builds a grid from ASCII art, one string per row. The first row is
    /// the top of the map (largest y). `#` marks an occupied cell, `?` an
    /// unknown cell, anything else is free.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S], resolution: f64) -> Result<Self, ConfigError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut grid = Self::empty(width, height, resolution)?;

        for (line_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let got = row.chars().count();
            if got != width {
                return Err(ConfigError::RaggedGridRows {
                    row: line_idx,
                    got,
                    expected: width,
                });
            }
            let y = height - 1 - line_idx;
            for (x, c) in row.chars().enumerate() {
                let value = match c {
                    '#' => OCCUPIED_CELL,
                    '?' => UNKNOWN_CELL,
                    _ => 0,
                };
                grid.set_cell(x, y, value);
            }
        }
        Ok(grid)
    }

    /// Sets the world pose of the grid's (0, 0) cell corner.
    pub fn with_origin(mut self, origin: Pose2D) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the occupancy value at which a cell counts as occupied.
    pub fn with_occupied_threshold(mut self, threshold: u8) -> Self {
        self.occupied_threshold = threshold;
        self
    }

    /// Writes one cell. Panics on an out-of-range index; the grid is only
    /// mutable while being built.
    pub fn set_cell(&mut self, x: usize, y: usize, value: u8) {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        self.data[(y, x)] = value;
    }

    /// Marks one cell fully occupied.
    pub fn occupy(&mut self, x: usize, y: usize) {
        self.set_cell(x, y, OCCUPIED_CELL);
    }

    /// Freezes the grid into a shared snapshot.
    pub fn into_snapshot(self) -> MapSnapshot {
        Arc::new(self)
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> Pose2D {
        self.origin
    }

    /// Classifies the cell containing a world coordinate. Pure lookup.
    pub fn cell_state(&self, point: &Point2<f64>) -> CellState {
        let local = self.origin.to_isometry().inverse_transform_point(point);
        let gx = (local.x / self.resolution).floor();
        let gy = (local.y / self.resolution).floor();
        if gx < 0.0 || gy < 0.0 || gx >= self.width as f64 || gy >= self.height as f64 {
            return CellState::OutOfBounds;
        }
        let value = self.data[(gy as usize, gx as usize)];
        if value != UNKNOWN_CELL && value >= self.occupied_threshold {
            CellState::Occupied
        } else {
            CellState::Free
        }
    }
}
