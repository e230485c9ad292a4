//! Basin occupancy.

use crate::config::BasinConfig;
use crate::field::FieldSources;
use crate::store::EntityStore;
use ovel_data::{Basin, SimEvent, Vec2};

/// Index of the nearest basin strictly within `radius`. Basins are scanned in
/// id order, so equal distances resolve to the lower id.
fn nearest_within(basins: &[Basin], p: Vec2, radius: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    let limit = radius * radius;
    for (i, basin) in basins.iter().enumerate() {
        let d2 = basin.position.distance_squared(p);
        if d2 < limit && best.is_none_or(|(_, bd)| d2 < bd) {
            best = Some((i, d2));
        }
    }
    best.map(|(i, _)| i)
}

fn capture(basin: &mut Basin, p: Vec2, config: &BasinConfig) {
    basin.count = (basin.count + 1.0).min(config.max_count);
    basin.position = basin.position.lerp(p, config.drift);
    basin.captured = true;
}

/// Captures into the nearest basin or creates one where the field is dense.
fn capture_or_create(
    store: &mut EntityStore,
    sources: &FieldSources,
    config: &BasinConfig,
    p: Vec2,
) -> Option<u64> {
    if let Some(idx) = nearest_within(&store.basins, p, config.capture_radius) {
        capture(&mut store.basins[idx], p, config);
        return Some(store.basins[idx].id);
    }
    if store.basins.len() < config.max_basins && sources.density(p) >= config.creation_threshold {
        return Some(store.spawn_basin(p));
    }
    None
}

/// Merges basins closer than `merge_radius`. The lower id survives with the
/// summed count at the count-weighted position.
fn merge(
    store: &mut EntityStore,
    config: &BasinConfig,
    membership: &mut [Option<u64>],
    tick: u64,
    events: &mut Vec<SimEvent>,
) {
    let limit = config.merge_radius * config.merge_radius;
    let mut i = 0;
    while i < store.basins.len() {
        let mut j = i + 1;
        while j < store.basins.len() {
            if store.basins[i].position.distance_squared(store.basins[j].position) >= limit {
                j += 1;
                continue;
            }
            let absorbed = store.basins.remove(j);
            let survivor = &mut store.basins[i];
            let total = survivor.count + absorbed.count;
            if total > 0.0 {
                survivor.position = (survivor.position * survivor.count
                    + absorbed.position * absorbed.count)
                    * (1.0 / total);
            }
            survivor.count = total.min(config.max_count);
            survivor.dwell = survivor.dwell.max(absorbed.dwell);
            survivor.captured |= absorbed.captured;
            for member in membership.iter_mut() {
                if *member == Some(absorbed.id) {
                    *member = Some(survivor.id);
                }
            }
            tracing::debug!(survivor = survivor.id, absorbed = absorbed.id, tick, "Basins merged");
            events.push(SimEvent::Merge {
                survivor: survivor.id,
                absorbed: absorbed.id,
                tick,
            });
        }
        i += 1;
    }
}

pub fn update(
    store: &mut EntityStore,
    sources: &FieldSources,
    config: &BasinConfig,
    tick: u64,
    events: &mut Vec<SimEvent>,
) {
    for basin in &mut store.basins {
        basin.captured = false;
    }

    let mut membership = vec![None; store.probes.len()];
    for (i, member) in membership.iter_mut().enumerate() {
        let p = store.probes[i].position;
        *member = capture_or_create(store, sources, config, p);
    }
    for i in 0..store.invariants.len() {
        let p = store.invariants[i].position;
        capture_or_create(store, sources, config, p);
    }

    merge(store, config, &mut membership, tick, events);

    for basin in &mut store.basins {
        if !basin.captured {
            basin.count *= config.decay;
        }
    }
    store
        .basins
        .retain(|b| b.captured || b.count >= config.prune_below);

    let raw = if membership.is_empty() {
        0.0
    } else {
        let unchanged = membership
            .iter()
            .zip(&store.membership)
            .filter(|(now, before)| now == before)
            .count();
        unchanged as f64 / membership.len() as f64
    };
    store.occupancy_stability = Some(match store.occupancy_stability {
        Some(prev) => prev + config.occupancy_smoothing * (raw - prev),
        None => raw,
    });
    store.membership = membership;
}
