//! Birth, death and energy feedback of dynamic invariants.

use crate::config::LifecycleConfig;
use crate::field::FieldSources;
use crate::registry::InvariantRegistry;
use crate::store::EntityStore;
use ovel_data::{DeathCause, DynamicInvariant, SimEvent, Vec2};
use std::collections::BTreeMap;

type RegionKey = (i64, i64);

fn region_of(p: Vec2, size: f64) -> RegionKey {
    ((p.x / size).floor() as i64, (p.y / size).floor() as i64)
}

fn excluded(invariants: &[DynamicInvariant], p: Vec2, radius: f64) -> bool {
    let limit = radius * radius;
    invariants
        .iter()
        .any(|inv| inv.position.distance_squared(p) < limit)
}

/// Updates basin dwell counters and realizes at most one birth per region.
pub fn births(
    store: &mut EntityStore,
    sources: &FieldSources,
    registry: &mut InvariantRegistry,
    config: &LifecycleConfig,
    tick: u64,
    events: &mut Vec<SimEvent>,
) {
    let mut densities = Vec::with_capacity(store.basins.len());
    for basin in &mut store.basins {
        let density = sources.density(basin.position);
        basin.dwell = if density >= config.birth_threshold {
            basin.dwell.saturating_add(1)
        } else {
            0
        };
        densities.push(density);
    }

    if store.invariants.len() >= config.max_invariants {
        return;
    }

    // Basins are in id order, so only a strictly denser candidate replaces
    // the current best of its region.
    let mut best: BTreeMap<RegionKey, (f64, usize)> = BTreeMap::new();
    for (idx, basin) in store.basins.iter().enumerate() {
        if basin.dwell < config.dwell_window
            || excluded(&store.invariants, basin.position, config.exclusion_radius)
        {
            continue;
        }
        let density = densities[idx];
        best.entry(region_of(basin.position, config.region_size))
            .and_modify(|slot| {
                if density > slot.0 {
                    *slot = (density, idx);
                }
            })
            .or_insert((density, idx));
    }

    for (density, idx) in best.into_values() {
        if store.invariants.len() >= config.max_invariants {
            break;
        }
        let position = store.basins[idx].position;
        // Winners of neighbouring regions may sit close to each other.
        if excluded(&store.invariants, position, config.exclusion_radius) {
            continue;
        }
        let id = store.next_invariant_id();
        let energy = (config.birth_energy_gain * density).min(config.max_energy);
        store.invariants.push(DynamicInvariant {
            id: id.clone(),
            position,
            energy,
            stability: density.clamp(0.0, 1.0),
            dynamic: true,
            birth_tick: tick,
            low_streak: 0,
        });
        store.basins[idx].dwell = 0;
        registry.on_birth(&id, tick);
        tracing::debug!(id = %id, tick, energy, "Invariant born");
        events.push(SimEvent::Birth {
            id,
            tick,
            position,
            energy,
        });
    }
}

/// Removes invariants that stayed below a death threshold for
/// `death_hysteresis` consecutive steps.
pub fn deaths(
    store: &mut EntityStore,
    registry: &mut InvariantRegistry,
    config: &LifecycleConfig,
    tick: u64,
    events: &mut Vec<SimEvent>,
) {
    store.invariants.retain_mut(|inv| {
        let starved = inv.energy < config.death_energy;
        let unstable = inv.stability < config.death_stability;
        if !(starved || unstable) {
            inv.low_streak = 0;
            return true;
        }
        inv.low_streak = inv.low_streak.saturating_add(1);
        if inv.low_streak < config.death_hysteresis {
            return true;
        }
        let cause = if starved {
            DeathCause::EnergyDepleted
        } else {
            DeathCause::Unstable
        };
        let age = inv.age(tick);
        registry.on_death(&inv.id);
        tracing::debug!(id = %inv.id, tick, age, ?cause, "Invariant died");
        events.push(SimEvent::Death {
            id: inv.id.clone(),
            tick,
            age,
            cause,
        });
        false
    });
}

/// Upkeep rate of an invariant `age` ticks old. Zero before the elder phase,
/// then growing linearly with the time spent as an elder.
fn senescence(age: u64, elder_at: u64, rate: f64) -> f64 {
    if age < elder_at {
        return 0.0;
    }
    rate * (age - elder_at) as f64 / elder_at.max(1) as f64
}

/// Grows or decays energy from local support and relaxes stability toward it.
///
/// Positive growth is logistic toward the energy budget; the total is read
/// once so the update does not depend on iteration order. Elders also pay an
/// upkeep that rises with age, so every invariant eventually starves.
pub fn feedback(
    store: &mut EntityStore,
    sources: &FieldSources,
    config: &LifecycleConfig,
    energy_budget: f64,
    elder_at: u64,
    tick: u64,
    delta: f64,
) {
    let total = store.total_energy();
    let headroom = 1.0 - total / energy_budget.max(f64::EPSILON);
    for inv in &mut store.invariants {
        let support = sources.support(inv.position);
        let growth = config.feedback_gain * (support - config.sustain_level);
        let mut change = if growth > 0.0 {
            delta * growth * inv.energy * headroom
        } else {
            delta * growth * inv.energy
        };
        change -= delta * senescence(inv.age(tick), elder_at, config.senescence_rate) * inv.energy;
        inv.energy = (inv.energy + change).clamp(0.0, config.max_energy);
        inv.stability = (inv.stability + delta * config.stability_rate * (support - inv.stability))
            .clamp(0.0, 1.0);
    }
}
