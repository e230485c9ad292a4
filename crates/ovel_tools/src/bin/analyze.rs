use clap::Parser;
use ovel_io::telemetry::{read_records, TelemetryRecord};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize an Ovel telemetry log", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "logs/telemetry.jsonl")]
    input: String,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize, PartialEq)]
struct Summary {
    /// Runs found in the log. A tick that does not advance starts a new run;
    /// everything below describes the last one.
    runs: usize,
    samples: usize,
    first_tick: u64,
    final_tick: u64,
    peak_living: usize,
    /// Distinct invariant ids seen in the sampled registries. Invariants born
    /// and dead between two samples are never seen.
    births_observed: usize,
    min_conserved_delta: f64,
    max_conserved_delta: f64,
    mean_near_boundary_pct: f64,
    world_clamp_samples: usize,
}

/// Splits an appended log into runs at every tick that fails to advance.
fn split_runs(records: &[TelemetryRecord]) -> Vec<&[TelemetryRecord]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..records.len() {
        if records[i].telemetry.tick <= records[i - 1].telemetry.tick {
            runs.push(&records[start..i]);
            start = i;
        }
    }
    if start < records.len() {
        runs.push(&records[start..]);
    }
    runs
}

fn summarize(records: &[TelemetryRecord]) -> Summary {
    let runs = split_runs(records);
    let Some(&last) = runs.last() else {
        return Summary::default();
    };
    let mut summary = Summary {
        runs: runs.len(),
        samples: last.len(),
        first_tick: last[0].telemetry.tick,
        min_conserved_delta: f64::INFINITY,
        max_conserved_delta: f64::NEG_INFINITY,
        ..Default::default()
    };
    let mut seen: HashSet<&str> = HashSet::new();
    let mut near_total = 0.0;
    for record in last {
        let m = &record.telemetry.metrics;
        summary.final_tick = record.telemetry.tick;
        summary.peak_living = summary.peak_living.max(m.living_invariants);
        seen.extend(record.telemetry.registry_entries.iter().map(|e| e.id.as_str()));
        summary.min_conserved_delta = summary.min_conserved_delta.min(m.conserved_delta);
        summary.max_conserved_delta = summary.max_conserved_delta.max(m.conserved_delta);
        near_total += m.containment_near_boundary_pct;
        if m.containment_world_clamps > 0 {
            summary.world_clamp_samples += 1;
        }
    }
    summary.births_observed = seen.len();
    summary.mean_near_boundary_pct = near_total / last.len() as f64;
    summary
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let records = read_records(&args.input)?;
    let summary = summarize(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.samples == 0 {
        println!("No telemetry found in {}.", args.input);
        return Ok(());
    }

    println!("Telemetry summary for {}", args.input);
    if summary.runs > 1 {
        println!("  runs:               {} (showing the last)", summary.runs);
    }
    println!("  samples:            {}", summary.samples);
    println!("  ticks:              {} .. {}", summary.first_tick, summary.final_tick);
    println!("  peak living:        {}", summary.peak_living);
    println!("  births observed:    {}", summary.births_observed);
    println!(
        "  conserved delta:    [{:.3}, {:.3}]",
        summary.min_conserved_delta, summary.max_conserved_delta
    );
    println!("  near boundary (%):  {:.2}", summary.mean_near_boundary_pct);
    println!("  world clamp samples: {}", summary.world_clamp_samples);

    Ok(())
}
