mod common;

use common::SimBuilder;
use ovel_lib::{Simulation, StagePreset, DEFAULT_DELTA};

#[test]
fn test_same_seed_same_trajectory() {
    let (mut sim1, preset) = SimBuilder::new().with_seed(12345).build();
    let (mut sim2, _) = SimBuilder::new().with_seed(12345).build();

    for _ in 0..300 {
        sim1.step(&preset, DEFAULT_DELTA).unwrap();
        sim2.step(&preset, DEFAULT_DELTA).unwrap();

        assert_eq!(sim1.tick(), sim2.tick());
        let ids1: Vec<&str> = sim1.invariants().iter().map(|i| i.id.as_str()).collect();
        let ids2: Vec<&str> = sim2.invariants().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids1, ids2, "Invariant ids diverged at tick {}", sim1.tick());
        assert_eq!(sim1.metrics(), sim2.metrics(), "Metrics diverged at tick {}", sim1.tick());
    }

    assert_eq!(sim1.state_digest(), sim2.state_digest());
}

#[test]
fn test_varying_delta_sequence_is_reproducible() {
    let preset = StagePreset::default();
    let deltas = [0.008, 0.004, 0.016, 0.0, 0.008];
    let mut sim1 = Simulation::new(7u64);
    let mut sim2 = Simulation::new(7u64);
    for i in 0..200 {
        let delta = deltas[i % deltas.len()];
        sim1.step(&preset, delta).unwrap();
        sim2.step(&preset, delta).unwrap();
    }
    assert_eq!(sim1.snapshot(), sim2.snapshot());
}

#[test]
fn test_different_seeds_diverge() {
    let preset = StagePreset::default();
    let mut sim1 = Simulation::new(1u64);
    let mut sim2 = Simulation::new(2u64);
    sim1.run(&preset, DEFAULT_DELTA, 10).unwrap();
    sim2.run(&preset, DEFAULT_DELTA, 10).unwrap();
    assert_ne!(sim1.state_digest(), sim2.state_digest());
    assert_ne!(sim1.anchors(), sim2.anchors());
}

#[test]
fn test_rejected_step_does_not_disturb_stream() {
    let preset = StagePreset::default();
    let mut sim1 = Simulation::new(99u64);
    let mut sim2 = Simulation::new(99u64);
    for _ in 0..50 {
        sim1.step(&preset, DEFAULT_DELTA).unwrap();
        assert!(sim2.step(&preset, f64::NAN).is_err());
        sim2.step(&preset, DEFAULT_DELTA).unwrap();
    }
    assert_eq!(sim1.state_digest(), sim2.state_digest());
}

#[test]
fn test_coexisting_simulations_are_independent() {
    let preset = StagePreset::default();
    let mut lone = Simulation::new(5u64);
    let mut a = Simulation::new(5u64);
    let mut b = Simulation::new(6u64);
    for _ in 0..40 {
        lone.step(&preset, DEFAULT_DELTA).unwrap();
        a.step(&preset, DEFAULT_DELTA).unwrap();
        b.step(&preset, DEFAULT_DELTA).unwrap();
    }
    assert_eq!(lone.snapshot(), a.snapshot());
}
