//! Headless runs: step a simulation for a fixed number of ticks, sample
//! telemetry at a cadence and optionally record a replay manifest.

use anyhow::Context;
use ovel_core::diagnostics::StepTimer;
use ovel_core::{preset_by_name, FieldGrid, Seed, Simulation, StagePreset, WorldBounds};
use ovel_data::SimMetrics;
use ovel_io::telemetry::TelemetryLogger;
use ovel_io::ReplayManifest;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const DENSITY_RAMP: &[u8] = b" .:-=+*#%@";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub seed: Seed,
    pub ticks: u64,
    pub delta: f64,
    pub stage: Option<String>,
    pub config: Option<PathBuf>,
    pub telemetry_every: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: Seed::new(ovel_core::DEFAULT_SEED),
            ticks: 1000,
            delta: ovel_core::DEFAULT_DELTA,
            stage: None,
            config: None,
            telemetry_every: None,
            log_dir: None,
            manifest: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub stage: String,
    pub ticks: u64,
    pub metrics: SimMetrics,
    pub total_births: u64,
    pub total_deaths: u64,
    pub telemetry_samples: u64,
    pub state_digest: String,
    pub mean_step: Duration,
    pub peak_step: Duration,
}

/// Picks the preset: a TOML file wins over a stage name, which wins over the
/// default stage.
pub fn resolve_preset(options: &RunOptions) -> anyhow::Result<StagePreset> {
    if let Some(path) = &options.config {
        return Ok(ovel_io::load_preset(path)?);
    }
    match &options.stage {
        Some(name) => preset_by_name(name).with_context(|| {
            format!(
                "unknown stage '{}' (available: {})",
                name,
                ovel_core::presets::preset_names().join(", ")
            )
        }),
        None => Ok(StagePreset::default()),
    }
}

/// Runs to completion and returns the final simulation with its report.
pub fn run(options: &RunOptions) -> anyhow::Result<(Simulation, RunReport)> {
    let preset = resolve_preset(options)?;
    let every = options
        .telemetry_every
        .unwrap_or(preset.display.telemetry_every)
        .max(1);

    let mut sim = Simulation::with_preset(options.seed, &preset)?;
    let mut logger = match &options.log_dir {
        Some(dir) => TelemetryLogger::new_at(dir)?,
        None => TelemetryLogger::new_dummy(),
    };
    let timer = StepTimer::new();

    tracing::info!(
        seed = %options.seed,
        stage = %preset.name,
        ticks = options.ticks,
        delta = options.delta,
        "Starting headless run"
    );

    for _ in 0..options.ticks {
        let started = Instant::now();
        sim.step(&preset, options.delta)
            .with_context(|| format!("step {} failed", sim.tick() + 1))?;
        timer.record_step(
            started.elapsed(),
            sim.tick(),
            sim.metrics().living_invariants,
            sim.events().len(),
        );
        if sim.tick() % every == 0 {
            logger.log(&sim.telemetry())?;
        }
    }

    if let Some(path) = &options.manifest {
        ReplayManifest::record(&sim, &preset, options.delta)
            .save(path)
            .with_context(|| format!("writing replay manifest {}", path.display()))?;
        tracing::info!(path = %path.display(), "Replay manifest written");
    }

    let report = RunReport {
        stage: preset.name.clone(),
        ticks: sim.tick(),
        metrics: *sim.metrics(),
        total_births: sim.registry().total_births(),
        total_deaths: sim.registry().total_deaths(),
        telemetry_samples: logger.records_written(),
        state_digest: sim.state_digest(),
        mean_step: timer.mean_step(),
        peak_step: timer.peak_step(),
    };
    Ok((sim, report))
}

/// Renders the density field as `cols` by `cols / 2` characters. Terminal
/// cells are about twice as tall as wide, so every other sample row is kept.
#[must_use]
pub fn density_preview(sim: &Simulation, cols: usize) -> String {
    let cols = cols.max(2);
    let bounds = WorldBounds::new(cols as f64, cols as f64);
    let mut grid = FieldGrid::new();
    sim.sample_field(&mut grid, &bounds, 1);

    let mut out = String::with_capacity((cols + 1) * cols / 2);
    for row in (0..grid.rows).step_by(2) {
        for col in 0..grid.cols {
            let d = grid.density_at(col, row).unwrap_or(0.0).clamp(0.0, 1.0);
            let idx = ((d * (DENSITY_RAMP.len() - 1) as f32).round() as usize)
                .min(DENSITY_RAMP.len() - 1);
            out.push(DENSITY_RAMP[idx] as char);
        }
        out.push('\n');
    }
    out
}
