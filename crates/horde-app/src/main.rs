use std::path::PathBuf;

use clap::Parser;

use horde_app::game_loop::{self, ORBIT_SPEED};
use horde_app::logging;
use horde_app::state::{LoopSettings, Orbit};
use horde_core::config::{ConfigError, SimConfig};
use horde_core::constants::TARGET_FPS;

/// Headless horde pursuit simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the config's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds of frame time (runs until killed otherwise)
    #[arg(long)]
    seconds: Option<f64>,

    /// Target frame rate
    #[arg(long, default_value_t = TARGET_FPS)]
    fps: u32,

    /// Move the target on a circle of this radius around the origin
    #[arg(long)]
    orbit_radius: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump_snapshot: bool,
}

fn main() -> Result<(), ConfigError> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;

    let settings = LoopSettings {
        fps: args.fps,
        max_seconds: args.seconds,
        orbit: args.orbit_radius.map(|radius| Orbit {
            radius,
            speed: ORBIT_SPEED,
        }),
    };
    log::info!("seed {}, {:?}", config.seed, settings);

    // The loop stops if the sender goes away, so hold it until the join.
    let (commands, handle) = game_loop::spawn_game_loop(config, settings)?;
    let snapshot = match handle.join() {
        Ok(snapshot) => snapshot,
        Err(panic) => std::panic::resume_unwind(panic),
    };
    drop(commands);

    log::info!(
        "finished at frame {}: {} agents, target health {:.2} ({:?})",
        snapshot.frame,
        snapshot.agents.len(),
        snapshot.target.health,
        snapshot.target.mode
    );

    if args.dump_snapshot {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("failed to serialize snapshot: {e}"),
        }
    }
    Ok(())
}
