use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flock_core::{CollisionPolicy, SimulationConfig};
use flock_runner::{build_simulation, load_config, run, RunOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CollisionArg {
    Ignore,
    Report,
    Remove,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Ignore => CollisionPolicy::Ignore,
            CollisionArg::Report => CollisionPolicy::Report,
            CollisionArg::Remove => CollisionPolicy::Remove,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless steering simulation runner", long_about = None)]
struct Args {
    /// JSON simulation config; the built-in default population if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Override the config's RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the config's collision policy
    #[arg(long, value_enum)]
    collision: Option<CollisionArg>,

    /// Write every n-th frame
    #[arg(short, long, default_value_t = 1)]
    every: u64,

    /// Write frames to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip frames and print only the run summary
    #[arg(long)]
    summary: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => {
            log::info!("No config given, using the default population");
            SimulationConfig::default()
        }
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(collision) = args.collision {
        config.collision = collision.into();
    }

    let mut sim = build_simulation(&config)?;
    let options = RunOptions {
        ticks: args.ticks,
        dt: args.dt,
        every: if args.summary { 0 } else { args.every },
    };

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = run(&mut sim, &options, &mut out).context("Simulation run failed")?;

    if args.summary {
        serde_json::to_writer_pretty(&mut out, &summary).context("Failed to encode summary")?;
        writeln!(out).context("Failed to write summary")?;
        out.flush().context("Failed to flush output")?;
    }

    Ok(())
}
