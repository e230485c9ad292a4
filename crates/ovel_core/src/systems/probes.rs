//! Probe motion and containment.

use crate::config::{ContainmentConfig, ProbeConfig};
use crate::containment::{Containment, ContainmentReport};
use crate::field::FieldSources;
use crate::rng::SimRng;
use crate::store::EntityStore;
use ovel_data::{SimEvent, Vec2};

/// Updates velocities in place and writes candidate positions, one per probe.
///
/// Noise is drawn in probe index order, two samples per probe.
pub fn steer(
    store: &mut EntityStore,
    sources: &FieldSources,
    config: &ProbeConfig,
    rng: &mut SimRng,
    delta: f64,
    candidates: &mut Vec<Vec2>,
) {
    candidates.clear();
    candidates.reserve(store.probes.len());
    for probe in &mut store.probes {
        let gradient = sources.structural_gradient(probe.position);
        let noise = rng.signed_vec();
        let accel = gradient * config.gradient_gain
            + gradient.perp() * config.swirl_gain
            + noise * config.noise_gain;
        probe.velocity = (probe.velocity * config.damping + accel * delta)
            .clamp_length(config.max_speed);
        candidates.push(probe.position + probe.velocity * delta);
    }
}

/// Applies containment to the candidates and commits them.
///
/// The radius is adjusted first from the extent recorded at the end of the
/// previous step. Invariants and basins left outside a shrunken disk are
/// pulled onto it.
pub fn confine(
    store: &mut EntityStore,
    containment: &mut Containment,
    config: &ContainmentConfig,
    candidates: &[Vec2],
    tick: u64,
    events: &mut Vec<SimEvent>,
) -> ContainmentReport {
    let mut report = ContainmentReport::default();

    if let Some((from_radius, to_radius)) = containment.adjust_radius(config) {
        report.world_clamps = 1;
        events.push(SimEvent::WorldClamp {
            tick,
            from_radius,
            to_radius,
        });
        for inv in &mut store.invariants {
            containment.pull_inside(&mut inv.position);
        }
        for basin in &mut store.basins {
            containment.pull_inside(&mut basin.position);
        }
    }

    for (index, (probe, &candidate)) in store.probes.iter_mut().zip(candidates).enumerate() {
        let (position, velocity) = match containment.clamp_probe(candidate, probe.velocity) {
            Some(clamped) => {
                report.probe_clamps += 1;
                events.push(SimEvent::ProbeClamp { probe: index, tick });
                clamped
            }
            None => (candidate, probe.velocity),
        };
        probe.previous_position = probe.position;
        probe.position = position;
        probe.velocity = velocity;
        probe.speed = position.distance(probe.previous_position);
        probe.age += 1;
    }

    containment.record_extent(store.probe_extent());
    report.radius = containment.radius();
    report.near_boundary_pct = containment
        .near_boundary_pct(store.probes.iter().map(|p| p.position), config.boundary_margin);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::rng::Seed;
    use ovel_data::{Anchor, Probe};

    fn store_with_probes(positions: &[(f64, f64)]) -> EntityStore {
        let anchors = vec![Anchor {
            id: "B".to_string(),
            position: Vec2::ZERO,
        }];
        let probes = positions
            .iter()
            .map(|&(x, y)| Probe::at(Vec2::new(x, y), Vec2::ZERO))
            .collect();
        EntityStore::new(anchors, probes)
    }

    #[test]
    fn test_steer_respects_max_speed() {
        let mut store = store_with_probes(&[(0.3, 0.0), (-0.2, 0.4)]);
        let sources = FieldSources::from_store(&store, &FieldConfig::default());
        let config = ProbeConfig {
            noise_gain: 1e6,
            ..Default::default()
        };
        let mut rng = SimRng::new(Seed::new(1));
        let mut candidates = Vec::new();
        steer(&mut store, &sources, &config, &mut rng, 0.008, &mut candidates);
        assert_eq!(candidates.len(), 2);
        for probe in &store.probes {
            assert!(probe.velocity.length() <= config.max_speed + 1e-12);
        }
    }

    #[test]
    fn test_steer_without_noise_moves_toward_anchor() {
        let mut store = store_with_probes(&[(0.3, 0.0)]);
        let sources = FieldSources::from_store(&store, &FieldConfig::default());
        let config = ProbeConfig {
            noise_gain: 0.0,
            swirl_gain: 0.0,
            ..Default::default()
        };
        let mut rng = SimRng::new(Seed::new(1));
        let mut candidates = Vec::new();
        steer(&mut store, &sources, &config, &mut rng, 0.1, &mut candidates);
        assert!(candidates[0].x < 0.3);
    }

    #[test]
    fn test_confine_clamps_and_reports() {
        let mut store = store_with_probes(&[(0.1, 0.0), (0.9, 0.0)]);
        let mut containment = Containment::new(1.0, 0.9);
        let config = ContainmentConfig {
            adaptive: false,
            ..Default::default()
        };
        let candidates = [Vec2::new(0.2, 0.0), Vec2::new(1.3, 0.0)];
        let mut events = Vec::new();
        let report = confine(&mut store, &mut containment, &config, &candidates, 4, &mut events);
        assert_eq!(report.probe_clamps, 1);
        assert_eq!(report.world_clamps, 0);
        assert_eq!(events, vec![SimEvent::ProbeClamp { probe: 1, tick: 4 }]);
        assert!((store.probes[1].position.length() - 1.0).abs() < 1e-12);
        assert_eq!(store.probes[1].previous_position, Vec2::new(0.9, 0.0));
        assert!((store.probes[1].speed - 0.1).abs() < 1e-12);
        assert_eq!(store.probes[0].age, 1);
        assert!((report.near_boundary_pct - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_confine_world_clamp_pulls_entities_inside() {
        let mut store = store_with_probes(&[(0.1, 0.0)]);
        store.spawn_basin(Vec2::new(0.0, 0.999));
        let mut containment = Containment::new(1.0, 0.1);
        let mut events = Vec::new();
        let report = confine(
            &mut store,
            &mut containment,
            &ContainmentConfig::default(),
            &[Vec2::new(0.1, 0.0)],
            1,
            &mut events,
        );
        assert_eq!(report.world_clamps, 1);
        assert!(report.radius < 1.0);
        assert!(store.basins[0].position.length() <= report.radius + 1e-12);
        assert!(matches!(events[0], SimEvent::WorldClamp { tick: 1, .. }));
    }
}
