use serde::{Deserialize, Serialize};

/// The twelve published statistics, recomputed wholesale after every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimMetrics {
    pub total_energy: f64,
    pub budget: f64,
    pub conserved_delta: f64,
    pub living_invariants: usize,
    pub entropy_spread: f64,
    pub dominance_index: f64,
    pub basin_occupancy_stability: f64,
    pub alignment_score: f64,
    pub containment_radius: f64,
    pub containment_world_clamps: u32,
    pub containment_probe_clamps: u32,
    /// Percentage (0-100) of probes inside the boundary margin.
    pub containment_near_boundary_pct: f64,
}

impl Default for SimMetrics {
    fn default() -> Self {
        Self {
            total_energy: 0.0,
            budget: 0.0,
            conserved_delta: 0.0,
            living_invariants: 0,
            entropy_spread: 0.0,
            dominance_index: 0.0,
            basin_occupancy_stability: 0.0,
            alignment_score: 0.0,
            containment_radius: 1.0,
            containment_world_clamps: 0,
            containment_probe_clamps: 0,
            containment_near_boundary_pct: 0.0,
        }
    }
}

impl SimMetrics {
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.total_energy,
            self.budget,
            self.conserved_delta,
            self.entropy_spread,
            self.dominance_index,
            self.basin_occupancy_stability,
            self.alignment_score,
            self.containment_radius,
            self.containment_near_boundary_pct,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
