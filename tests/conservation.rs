mod common;

use common::SimBuilder;
use ovel_lib::DEFAULT_DELTA;

#[test]
fn test_conserved_delta_bounded_over_long_run() {
    let (mut sim, preset) = SimBuilder::new().with_seed(424_242).build();
    let budget = preset.budget.energy_budget;
    let bound = budget + preset.lifecycle.max_invariants as f64 * preset.lifecycle.max_energy;

    let mut early_peak = 0.0f64;
    let mut late_peak = 0.0f64;

    for i in 0..10_000u64 {
        sim.step(&preset, DEFAULT_DELTA)
            .unwrap_or_else(|e| panic!("Simulation failed at tick {}: {}", i, e));
        assert_metrics_finite!(sim);

        let metrics = sim.metrics();
        assert_eq!(metrics.budget, budget);
        assert!(
            (metrics.total_energy - budget - metrics.conserved_delta).abs() < 1e-9,
            "conservedDelta is not totalEnergy - budget at tick {}",
            sim.tick()
        );
        assert!(
            metrics.conserved_delta.abs() <= bound,
            "Energy drifted to {} at tick {}",
            metrics.conserved_delta,
            sim.tick()
        );

        if i < 5_000 {
            early_peak = early_peak.max(metrics.conserved_delta.abs());
        } else {
            late_peak = late_peak.max(metrics.conserved_delta.abs());
        }
    }

    // The empty world starts a full budget below target, so any late drift
    // beyond that plus half a budget means the feedback is not settling.
    assert!(
        late_peak <= early_peak + 0.5 * budget,
        "Late drift {} exceeds early drift {}",
        late_peak,
        early_peak
    );
}

#[test]
fn test_energy_per_invariant_stays_in_range() {
    let (mut sim, preset) = SimBuilder::new().with_seed(9).build();

    for _ in 0..1_500 {
        sim.step(&preset, DEFAULT_DELTA).unwrap();
        for inv in sim.invariants() {
            assert!(inv.energy >= 0.0 && inv.energy <= preset.lifecycle.max_energy);
            assert!((0.0..=1.0).contains(&inv.stability));
        }
        let sum: f64 = sim.invariants().iter().map(|i| i.energy).sum();
        assert!((sum - sim.metrics().total_energy).abs() < 1e-9);
    }
}
