// triton_sim/src/main.rs

use clap::Parser;
use triton_sim::cli::Cli;
use triton_sim::config::load_scenario;
use triton_sim::runtime::Simulation;
use triton_sim::sinks::{LogSink, RecordingSink, TeeSink};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Cli::parse();

    let config = load_scenario(&args.scenario)?;
    let mut simulation = Simulation::from_config(&config)?;
    if let Some(duration) = args.duration {
        simulation = simulation.with_duration(duration);
    }

    let mut recorder = RecordingSink::default();
    let summary = if args.quiet {
        simulation.run(&mut recorder)
    } else {
        let mut logger = LogSink;
        let mut tee = TeeSink::new(&mut logger, &mut recorder);
        simulation.run(&mut tee)
    };

    println!("simulated {:.2}s", summary.elapsed);
    for stats in &summary.sensors {
        println!(
            "  {}: {} readings published, {} ticks skipped",
            stats.label, stats.published, stats.skipped
        );
    }
    if let Some(last) = recorder.readings.last() {
        println!(
            "  last reading: {:.3} m in frame '{}' at t={:.2}s",
            last.range, last.frame_id, last.timestamp
        );
    }
    Ok(())
}
