// triton_sim/src/prelude.rs

pub use crate::cli::Cli;
pub use crate::config::{load_scenario, ScenarioConfig, ScenarioError, SensorConfig};
pub use crate::motion::KinematicPoseSource;
pub use crate::runtime::{RunSummary, Simulation, SIM_STEP};
pub use crate::sinks::{LogSink, RecordingSink, TeeSink};
pub use crate::timer::Ticker;

// Re-export the pure core surface alongside the runtime.
pub use triton_core::prelude::*;
