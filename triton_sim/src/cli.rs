// triton_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Triton: sonar range-sensor simulation over 2D occupancy maps.
///
/// This struct defines the command-line arguments that can be passed to any
/// binary application that uses the Triton simulation library.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/corridor.toml")]
    pub scenario: PathBuf,

    /// Override the scenario's simulation duration, in seconds.
    #[arg(long)]
    pub duration: Option<f64>,

    /// Suppress per-reading log output.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}
