// triton_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::scan::{PoseSource, ReadingSink};
pub use crate::sonar::RangeSensor;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::errors::{ConfigError, PoseLookupError};
pub use crate::grid::{CellState, MapSnapshot, OccupancyGrid};
pub use crate::messages::{FrameTransform, RangeReading};
pub use crate::types::Pose2D;

// --- Concrete Implementations (Export common ones for convenience) ---
pub use crate::noise::{GaussianNoise, NoNoise, ProportionalNoise, RangeNoise};
pub use crate::raycast::RayCaster;
pub use crate::scan::{ScanScheduler, ScanState, TickOutcome};
pub use crate::sonar::{Sonar, SonarDescription};
