//! Headless host for `flock-core`.
//!
//! Loads a [`SimulationConfig`], drives the simulation with a fixed timestep
//! and streams what a renderer would draw as JSON lines.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use flock_core::{Contact, DrawPayload, EntityId, Simulation, SimulationConfig};
use serde::{Deserialize, Serialize};

/// One rendered frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub tick: u64,
    pub time: f64,
    pub entities: Vec<DrawPayload>,
    pub contacts: Vec<Contact>,
    pub removed: Vec<EntityId>,
}

/// Totals over a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: f64,
    pub initial_entities: usize,
    pub final_entities: usize,
    pub total_contacts: usize,
    pub total_removed: usize,
    pub frames_written: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub ticks: u64,
    pub dt: f32,
    /// Write every n-th frame; `0` writes none.
    pub every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            every: 1,
        }
    }
}

pub fn load_config(path: &Path) -> Result<SimulationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

pub fn build_simulation(config: &SimulationConfig) -> Result<Simulation> {
    Simulation::from_config(config).context("Invalid simulation config")
}

/// Starts `sim`, advances it `options.ticks` times and stops it again.
pub fn run<W: Write>(sim: &mut Simulation, options: &RunOptions, out: &mut W) -> Result<RunSummary> {
    if options.dt.is_nan() || options.dt <= 0.0 {
        anyhow::bail!("Timestep must be positive, got {}", options.dt);
    }

    let initial_entities = sim.len();
    let mut total_contacts = 0;
    let mut total_removed = 0;
    let mut frames_written = 0;

    log::info!(
        "Running {} ticks of {:.4}s with {} entities",
        options.ticks,
        options.dt,
        initial_entities
    );

    sim.start();
    for _ in 0..options.ticks {
        let report = sim.tick(options.dt);
        total_contacts += report.contacts.len();
        total_removed += report.removed.len();

        if !report.removed.is_empty() {
            log::debug!(
                "Tick {}: removed {:?}, {} left",
                sim.tick_count(),
                report.removed,
                sim.len()
            );
        }

        if options.every > 0 && sim.tick_count() % options.every == 0 {
            let frame = FrameRecord {
                tick: sim.tick_count(),
                time: sim.elapsed(),
                entities: sim.draw_payloads(),
                contacts: report.contacts,
                removed: report.removed,
            };
            serde_json::to_writer(&mut *out, &frame).context("Failed to encode frame")?;
            writeln!(out).context("Failed to write frame")?;
            frames_written += 1;
        }
    }
    sim.stop();
    out.flush().context("Failed to flush output")?;

    let summary = RunSummary {
        ticks: sim.tick_count(),
        elapsed: sim.elapsed(),
        initial_entities,
        final_entities: sim.len(),
        total_contacts,
        total_removed,
        frames_written,
    };
    log::info!(
        "Finished after {} ticks: {} of {} entities left, {} contacts",
        summary.ticks,
        summary.final_entities,
        summary.initial_entities,
        summary.total_contacts
    );
    Ok(summary)
}
