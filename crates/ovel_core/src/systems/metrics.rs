//! Published statistics, recomputed wholesale after every step.

use crate::containment::ContainmentReport;
use crate::store::EntityStore;
use ovel_data::{SimMetrics, Vec2};

/// Mean squared distance from the centroid over `R^2 / 2`, the value for
/// points spread uniformly over the disk. Clamped to `[0, 1]`.
#[must_use]
pub fn entropy_spread(positions: &[Vec2], radius: f64) -> f64 {
    if positions.len() < 2 {
        return 0.0;
    }
    let n = positions.len() as f64;
    let centroid = positions.iter().fold(Vec2::ZERO, |acc, &p| acc + p) * (1.0 / n);
    let mean_sq = positions
        .iter()
        .map(|p| p.distance_squared(centroid))
        .sum::<f64>()
        / n;
    let reference = (radius * radius / 2.0).max(f64::EPSILON);
    (mean_sq / reference).clamp(0.0, 1.0)
}

/// 0 when energy is spread evenly, 1 when one invariant holds all of it.
#[must_use]
pub fn dominance_index(energies: &[f64]) -> f64 {
    let n = energies.len();
    let total: f64 = energies.iter().sum();
    if n == 0 || total <= f64::EPSILON {
        return 0.0;
    }
    if n == 1 {
        return 1.0;
    }
    let share = energies.iter().copied().fold(0.0, f64::max) / total;
    let even = 1.0 / n as f64;
    ((share - even) / (1.0 - even)).clamp(0.0, 1.0)
}

/// Length of the summed unit velocities over the number of moving probes.
#[must_use]
pub fn alignment_score<I>(velocities: I) -> f64
where
    I: IntoIterator<Item = Vec2>,
{
    let mut sum = Vec2::ZERO;
    let mut moving = 0usize;
    for v in velocities {
        if let Some(unit) = v.try_normalize() {
            sum += unit;
            moving += 1;
        }
    }
    if moving == 0 {
        0.0
    } else {
        (sum.length() / moving as f64).clamp(0.0, 1.0)
    }
}

#[must_use]
pub fn compute(
    store: &EntityStore,
    containment: &ContainmentReport,
    energy_budget: f64,
) -> SimMetrics {
    let positions: Vec<Vec2> = store.invariants.iter().map(|inv| inv.position).collect();
    let energies: Vec<f64> = store.invariants.iter().map(|inv| inv.energy).collect();
    let total_energy: f64 = energies.iter().sum();

    SimMetrics {
        total_energy,
        budget: energy_budget,
        conserved_delta: total_energy - energy_budget,
        living_invariants: store.invariants.len(),
        entropy_spread: entropy_spread(&positions, containment.radius),
        dominance_index: dominance_index(&energies),
        basin_occupancy_stability: store.basin_occupancy_stability(),
        alignment_score: alignment_score(store.probes.iter().map(|p| p.velocity)),
        containment_radius: containment.radius,
        containment_world_clamps: containment.world_clamps,
        containment_probe_clamps: containment.probe_clamps,
        containment_near_boundary_pct: containment.near_boundary_pct,
    }
}
