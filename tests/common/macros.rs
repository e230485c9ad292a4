/// Asserts the registry, the store and the metrics agree on the living set.
#[macro_export]
macro_rules! assert_registry_consistent {
    ($sim:expr) => {
        let living = $sim.invariants().len();
        let entries = $sim.registry_entries();
        assert_eq!(
            $sim.metrics().living_invariants,
            living,
            "livingInvariants mismatch at tick {}",
            $sim.tick()
        );
        assert_eq!(entries.len(), living, "Registry size mismatch at tick {}", $sim.tick());
        for entry in &entries {
            assert!(
                entry.birth_tick <= $sim.tick(),
                "Entry {} born in the future",
                entry.id
            );
            assert!(
                $sim.invariants().iter().any(|inv| inv.id == entry.id),
                "Registry entry {} has no living invariant",
                entry.id
            );
        }
    };
}

/// Asserts every probe lies inside the active containment disk.
#[macro_export]
macro_rules! assert_probes_contained {
    ($sim:expr) => {
        let radius = $sim.metrics().containment_radius;
        for (i, probe) in $sim.probes().iter().enumerate() {
            assert!(
                probe.position.length() <= radius + 1e-9,
                "Probe {} at distance {} outside radius {} at tick {}",
                i,
                probe.position.length(),
                radius,
                $sim.tick()
            );
        }
    };
}

/// Asserts that a metrics snapshot contains only finite values.
#[macro_export]
macro_rules! assert_metrics_finite {
    ($sim:expr) => {
        assert!(
            $sim.metrics().is_finite(),
            "Non-finite metrics at tick {}: {:?}",
            $sim.tick(),
            $sim.metrics()
        );
    };
}
