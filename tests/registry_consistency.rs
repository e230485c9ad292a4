mod common;

use common::{run_until, SimBuilder};
use ovel_lib::{LifecyclePhase, SimEvent, DEFAULT_DELTA};
use std::collections::HashMap;

#[test]
fn test_registry_tracks_living_set() {
    let (mut sim, preset) = SimBuilder::new().with_seed(424_242).build();
    assert_registry_consistent!(sim);

    for _ in 0..800 {
        sim.step(&preset, DEFAULT_DELTA).unwrap();
        assert_registry_consistent!(sim);
    }
    assert_eq!(
        sim.registry().total_births() - sim.registry().total_deaths(),
        sim.invariants().len() as u64
    );
}

#[test]
fn test_phases_never_regress() {
    let (mut sim, preset) = SimBuilder::new().with_seed(1337).build();
    let mut last_phase: HashMap<String, LifecyclePhase> = HashMap::new();

    for _ in 0..600 {
        sim.step(&preset, DEFAULT_DELTA).unwrap();
        for entry in sim.registry_entries() {
            if let Some(previous) = last_phase.get(&entry.id) {
                assert!(
                    entry.phase >= *previous,
                    "{} went from {} to {}",
                    entry.id,
                    previous,
                    entry.phase
                );
            }
            last_phase.insert(entry.id.clone(), entry.phase);
        }
    }
}

#[test]
fn test_ids_are_never_reused() {
    let (mut sim, preset) = SimBuilder::new()
        .with_seed(8)
        .with_preset(|p| {
            // Tight hysteresis and a small budget churn the population.
            p.lifecycle.death_hysteresis = 1;
            p.budget.energy_budget = 6.0;
        })
        .build();
    let mut born: Vec<String> = Vec::new();
    let mut deaths = 0;

    for _ in 0..1_200 {
        sim.step(&preset, DEFAULT_DELTA).unwrap();
        assert_registry_consistent!(sim);
        for event in sim.events() {
            match event {
                SimEvent::Birth { id, .. } => {
                    assert!(!born.contains(id), "Id {} reused", id);
                    born.push(id.clone());
                }
                SimEvent::Death { id, age, tick, .. } => {
                    assert!(born.contains(id), "Death of unknown {}", id);
                    assert!(sim.registry().get(id).is_none());
                    assert!(*age <= *tick);
                    deaths += 1;
                }
                _ => {}
            }
        }
    }
    assert!(deaths > 0, "No invariant died in 1200 ticks");
    assert_eq!(sim.registry().total_deaths(), deaths);
}

#[test]
fn test_default_stage_prunes_dead_in_same_step() {
    let (mut sim, preset) = SimBuilder::new().build();
    let died = run_until(&mut sim, &preset, 1_500, |s| {
        s.events().iter().any(SimEvent::is_death)
    });
    assert!(died, "Default stage never lost an invariant");

    let tick = sim.tick();
    for event in sim.events().iter().filter(|e| e.is_death()) {
        let SimEvent::Death { id, tick: at, age, .. } = event else {
            unreachable!();
        };
        assert_eq!(*at, tick);
        assert!(*age > 0);
        assert!(sim.registry().get(id).is_none(), "{} still registered", id);
        assert!(sim.invariants().iter().all(|inv| &inv.id != id));
    }
    assert!(sim.registry().total_deaths() >= 1);
    assert_registry_consistent!(sim);
}
