use anyhow::Result;
use clap::Parser;
use ovel_core::Seed;
use ovel_lib::runner::{density_preview, run, RunOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless runner for the Ovel field simulation", long_about = None)]
struct Args {
    /// Simulation seed (use `--seed=-7` for negative values)
    #[arg(short, long, default_value_t = Seed::new(ovel_core::DEFAULT_SEED))]
    seed: Seed,

    /// Number of steps to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Simulated time per step
    #[arg(short, long, default_value_t = ovel_core::DEFAULT_DELTA)]
    delta: f64,

    /// Built-in stage name
    #[arg(short, long)]
    preset: Option<String>,

    /// Custom stage preset (TOML); overrides --preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log telemetry every N ticks (defaults to the stage's cadence)
    #[arg(long)]
    telemetry_every: Option<u64>,

    /// Directory for telemetry.jsonl; telemetry is discarded when absent
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Write a replay manifest to this path after the run
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Print an ASCII density preview this many columns wide
    #[arg(long)]
    field: Option<usize>,

    /// List the built-in stages and exit
    #[arg(long)]
    list_presets: bool,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            seed: self.seed,
            ticks: self.ticks,
            delta: self.delta,
            stage: self.preset.clone(),
            config: self.config.clone(),
            telemetry_every: self.telemetry_every,
            log_dir: self.log_dir.clone(),
            manifest: self.manifest.clone(),
        }
    }
}

fn main() -> Result<()> {
    ovel_core::diagnostics::init_logging();

    let args = Args::parse();

    if args.list_presets {
        for preset in ovel_core::stage_presets() {
            println!(
                "{:<20} probes={:<5} anchors={:<2} budget={}",
                preset.name,
                preset.probes.count,
                preset.anchors.layout.len(),
                preset.budget.energy_budget
            );
        }
        return Ok(());
    }

    let (sim, report) = run(&args.run_options())?;

    println!("Stage '{}' finished at tick {}", report.stage, report.ticks);
    println!(
        "  living: {}  births: {}  deaths: {}",
        report.metrics.living_invariants, report.total_births, report.total_deaths
    );
    println!(
        "  energy: {:.3} / {:.1}  (delta {:+.3})",
        report.metrics.total_energy, report.metrics.budget, report.metrics.conserved_delta
    );
    println!(
        "  entropy: {:.3}  dominance: {:.3}  alignment: {:.3}  occupancy: {:.3}",
        report.metrics.entropy_spread,
        report.metrics.dominance_index,
        report.metrics.alignment_score,
        report.metrics.basin_occupancy_stability
    );
    println!(
        "  containment: r={:.3}  near boundary {:.1}%",
        report.metrics.containment_radius, report.metrics.containment_near_boundary_pct
    );
    println!(
        "  step time: mean {:?}  peak {:?}  telemetry samples: {}",
        report.mean_step, report.peak_step, report.telemetry_samples
    );
    println!("  digest: {}", report.state_digest);

    if let Some(cols) = args.field {
        println!();
        print!("{}", density_preview(&sim, cols));
    }

    Ok(())
}
