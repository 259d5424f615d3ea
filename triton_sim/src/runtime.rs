// triton_sim/src/runtime.rs

//! The fixed-step simulation loop: robots move, sensor timers fire, and
//! each firing runs one scan tick to completion before the next.

use crate::config::{ScenarioConfig, ScenarioError, SensorConfig};
use crate::motion::KinematicPoseSource;
use crate::timer::Ticker;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use triton_core::scan::{ReadingSink, ScanScheduler, TickOutcome};
use triton_core::sonar::Sonar;

/// Fixed simulation step. Small enough to resolve sensor rates up to
/// 200 Hz without aliasing the tickers.
pub const SIM_STEP: Duration = Duration::from_millis(5);

/// One sensor wired to its timer and its owning robot.
struct SensorRig {
    label: String,
    scheduler: ScanScheduler,
    ticker: Ticker,
    robot_idx: usize,
    published: u64,
    skipped: u64,
}

/// Per-sensor result counters for a finished run.
#[derive(Debug, Clone)]
pub struct SensorStats {
    pub label: String,
    pub published: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub elapsed: f64,
    pub sensors: Vec<SensorStats>,
}

impl RunSummary {
    pub fn total_published(&self) -> u64 {
        self.sensors.iter().map(|s| s.published).sum()
    }
}

pub struct Simulation {
    robots: Vec<KinematicPoseSource>,
    rigs: Vec<SensorRig>,
    duration: f64,
}

impl Simulation {
    /// Builds the world map, robots and sensor rigs from a parsed scenario.
    /// All validation happens here; `run` has no failure paths.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ScenarioError> {
        let map = config.world.build_map()?;
        let seed = config.simulation.seed.unwrap_or(0);

        let mut robots = Vec::with_capacity(config.robots.len());
        let mut rigs = Vec::new();

        for (robot_idx, robot) in config.robots.iter().enumerate() {
            robots.push(KinematicPoseSource::new(
                robot.starting_pose.to_pose(),
                robot.velocity.linear,
                robot.velocity.angular_deg.to_radians(),
            ));

            for sensor in &robot.sensors {
                let SensorConfig::Sonar(sonar_config) = sensor;
                let frame_id = format!("{}/{}", robot.name, sonar_config.name);
                let sonar =
                    Sonar::new(map.clone(), sonar_config.to_description(), frame_id.clone())?;

                // One RNG stream per sensor so adding a sensor never shifts
                // the noise another one draws.
                let rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(rigs.len() as u64));

                log::info!(
                    "rigging sonar '{}' on '{}' at {:.1} Hz",
                    sonar_config.name,
                    robot.name,
                    sonar_config.rate
                );
                rigs.push(SensorRig {
                    label: frame_id,
                    scheduler: ScanScheduler::new(Box::new(sonar), robot.name.clone(), Box::new(rng)),
                    ticker: Ticker::from_rate_hz(sonar_config.rate)?,
                    robot_idx,
                    published: 0,
                    skipped: 0,
                });
            }
        }

        Ok(Self {
            robots,
            rigs,
            duration: config.simulation.duration_seconds,
        })
    }

    /// Overrides the configured duration.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Runs the whole scenario, publishing through `sink`.
    pub fn run(&mut self, sink: &mut dyn ReadingSink) -> RunSummary {
        let dt = SIM_STEP.as_secs_f64();
        let steps = (self.duration / dt).round() as u64;
        let mut clock = 0.0;

        for _ in 0..steps {
            clock += dt;
            for rig in &mut self.rigs {
                if !rig.ticker.tick(SIM_STEP) {
                    continue;
                }
                match rig.scheduler.on_tick(clock, &self.robots[rig.robot_idx], sink) {
                    TickOutcome::Published => rig.published += 1,
                    TickOutcome::Skipped(err) => {
                        rig.skipped += 1;
                        log::warn!("skipping scan for '{}': {}", rig.label, err);
                    }
                }
            }
        }

        RunSummary {
            elapsed: clock,
            sensors: self
                .rigs
                .iter()
                .map(|rig| SensorStats {
                    label: rig.label.clone(),
                    published: rig.published,
                    skipped: rig.skipped,
                })
                .collect(),
        }
    }
}
