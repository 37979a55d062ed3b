#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Basecamp Defence session.

mod autopilot;
mod summary;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use basecamp_defence_core::{GameConfig, WELCOME_BANNER};
use basecamp_defence_system_session::Session;
use clap::Parser;

use crate::{autopilot::Autopilot, summary::Tally};

/// Runs a session for a fixed stretch of simulated time and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "basecamp-defence", version, about)]
struct CliArgs {
    /// Simulated seconds to play.
    #[arg(long, default_value_t = 120)]
    seconds: u64,
    /// Simulation frames per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,
    /// Seed overriding the one in the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with gameplay overrides.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Entry point for the Basecamp Defence command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    println!("{WELCOME_BANNER}");

    let frame = Duration::from_secs(1) / args.fps;
    let frames = args.seconds.saturating_mul(u64::from(args.fps));
    log::debug!("running {frames} frames of {frame:?}");

    let mut session = Session::new(&config);
    let mut pilot = Autopilot::new();
    let mut tally = Tally::default();
    for _ in 0..frames {
        let input = pilot.steer(&session);
        tally.record(&session.tick(frame, &input));
    }

    println!(
        "Simulated {}s at {} fps (seed {})",
        args.seconds, args.fps, config.seed
    );
    print!("{}", tally.report(&session));
    session.shutdown();
    Ok(())
}

fn load_config(args: &CliArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read configuration from {}", path.display()))?;
            GameConfig::from_toml_str(&source)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}
