mod common;

use common::SimBuilder;
use ovel_lib::{SimEvent, DEFAULT_DELTA};

#[test]
fn test_probes_stay_inside_every_step() {
    let (mut sim, preset) = SimBuilder::new().with_seed(2024).build();
    assert_probes_contained!(sim);

    for _ in 0..600 {
        sim.step(&preset, DEFAULT_DELTA).unwrap();
        assert_probes_contained!(sim);

        let metrics = sim.metrics();
        let clamp_events = sim
            .events()
            .iter()
            .filter(|e| matches!(e, SimEvent::ProbeClamp { .. }))
            .count();
        assert_eq!(metrics.containment_probe_clamps as usize, clamp_events);

        let world_events = sim
            .events()
            .iter()
            .filter(|e| matches!(e, SimEvent::WorldClamp { .. }))
            .count();
        assert_eq!(metrics.containment_world_clamps as usize, world_events);
        assert!(metrics.containment_world_clamps <= 1);

        assert!(metrics.containment_radius >= preset.containment.min_radius);
        assert!(metrics.containment_radius <= preset.containment.max_radius);
        assert!((0.0..=100.0).contains(&metrics.containment_near_boundary_pct));
    }
}

#[test]
fn test_clamped_probes_sit_on_boundary() {
    let (mut sim, preset) = SimBuilder::new().with_seed(77).build();

    for _ in 0..300 {
        sim.step(&preset, DEFAULT_DELTA).unwrap();
        let radius = sim.metrics().containment_radius;
        for event in sim.events() {
            if let SimEvent::ProbeClamp { probe, tick } = event {
                assert_eq!(*tick, sim.tick());
                let distance = sim.probes()[*probe].position.length();
                assert!(
                    (distance - radius).abs() < 1e-9,
                    "Clamped probe {} at {} off boundary {}",
                    probe,
                    distance,
                    radius
                );
            }
        }
    }
}

#[test]
fn test_fixed_radius_never_world_clamps() {
    let (mut sim, preset) = SimBuilder::new()
        .with_seed(5)
        .with_preset(|p| p.containment.adaptive = false)
        .build();
    let radius = sim.metrics().containment_radius;

    for _ in 0..200 {
        sim.step(&preset, DEFAULT_DELTA).unwrap();
        assert_eq!(sim.metrics().containment_world_clamps, 0);
        assert_eq!(sim.metrics().containment_radius, radius);
        assert_probes_contained!(sim);
    }
}

#[test]
fn test_invariants_and_basins_inside_after_shrink() {
    let (mut sim, preset) = SimBuilder::new().with_seed(31).build();

    for _ in 0..500 {
        sim.step(&preset, DEFAULT_DELTA).unwrap();
        let radius = sim.metrics().containment_radius;
        if sim.metrics().containment_world_clamps == 1 {
            for inv in sim.invariants() {
                assert!(inv.position.length() <= radius + 1e-9);
            }
        }
    }
}
