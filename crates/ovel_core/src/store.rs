//! Entity store: the single source of truth for everything that lives in a
//! simulation. Only the step systems mutate it.

use ovel_data::{Anchor, Basin, DynamicInvariant, Probe, SimEvent, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub anchors: Vec<Anchor>,
    pub probes: Vec<Probe>,
    /// Sorted by id; creation appends and ids only grow.
    pub basins: Vec<Basin>,
    /// Sorted by birth.
    pub invariants: Vec<DynamicInvariant>,
    /// Events of the most recent step only.
    pub events: Vec<SimEvent>,
    /// Basin each probe was captured by in the last step, parallel to `probes`.
    pub(crate) membership: Vec<Option<u64>>,
    /// Smoothed fraction of probes whose basin membership did not change.
    /// `None` until the first step has produced a sample.
    pub(crate) occupancy_stability: Option<f64>,
    next_basin_id: u64,
    next_invariant_id: u64,
}

impl EntityStore {
    #[must_use]
    pub fn new(anchors: Vec<Anchor>, probes: Vec<Probe>) -> Self {
        let membership = vec![None; probes.len()];
        Self {
            anchors,
            probes,
            basins: Vec::new(),
            invariants: Vec::new(),
            events: Vec::new(),
            membership,
            occupancy_stability: None,
            next_basin_id: 1,
            next_invariant_id: 1,
        }
    }

    pub(crate) fn spawn_basin(&mut self, position: Vec2) -> u64 {
        let id = self.next_basin_id;
        self.next_basin_id += 1;
        self.basins.push(Basin {
            id,
            position,
            count: 1.0,
            dwell: 0,
            captured: true,
        });
        id
    }

    pub(crate) fn next_invariant_id(&mut self) -> String {
        let id = format!("dyn-{}", self.next_invariant_id);
        self.next_invariant_id += 1;
        id
    }

    #[must_use]
    pub fn basin_index(&self, id: u64) -> Option<usize> {
        self.basins.binary_search_by_key(&id, |b| b.id).ok()
    }

    #[must_use]
    pub fn invariant(&self, id: &str) -> Option<&DynamicInvariant> {
        self.invariants.iter().find(|inv| inv.id == id)
    }

    #[must_use]
    pub fn total_energy(&self) -> f64 {
        self.invariants.iter().map(|inv| inv.energy).sum()
    }

    #[must_use]
    pub fn basin_occupancy_stability(&self) -> f64 {
        self.occupancy_stability.unwrap_or(0.0)
    }

    /// Largest basins by occupancy, ties broken by the lower id.
    #[must_use]
    pub fn significant_basins(&self, limit: usize) -> Vec<Basin> {
        let mut ranked: Vec<&Basin> = self.basins.iter().collect();
        ranked.sort_by(|a, b| b.count.total_cmp(&a.count).then(a.id.cmp(&b.id)));
        ranked.into_iter().take(limit).cloned().collect()
    }

    /// Most energetic invariants, ties kept in birth order.
    #[must_use]
    pub fn top_invariants(&self, limit: usize) -> Vec<DynamicInvariant> {
        let mut ranked: Vec<&DynamicInvariant> = self.invariants.iter().collect();
        ranked.sort_by(|a, b| b.energy.total_cmp(&a.energy));
        ranked.into_iter().take(limit).cloned().collect()
    }

    /// Largest distance of any probe from the origin.
    #[must_use]
    pub fn probe_extent(&self) -> f64 {
        self.probes
            .iter()
            .map(|p| p.position.length())
            .fold(0.0, f64::max)
    }

    /// Checks every numeric field. Used after each step.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.probes
            .iter()
            .all(|p| p.position.is_finite() && p.velocity.is_finite() && p.speed.is_finite())
            && self
                .basins
                .iter()
                .all(|b| b.position.is_finite() && b.count.is_finite())
            && self.invariants.iter().all(|inv| {
                inv.position.is_finite() && inv.energy.is_finite() && inv.stability.is_finite()
            })
    }
}
