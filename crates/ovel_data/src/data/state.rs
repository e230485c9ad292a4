use super::entity::Anchor;
use super::metrics::SimMetrics;
use super::registry::RegistryEntry;
use serde::{Deserialize, Serialize};

/// Clock and caller-provided presentation hints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Globals {
    pub tick: u64,
    pub time: f64,
    /// Shorter viewport side in pixels. Only scales presentation helpers.
    pub viewport_min_px: f64,
}

impl Default for Globals {
    fn default() -> Self {
        Self {
            tick: 0,
            time: 0.0,
            viewport_min_px: 1.0,
        }
    }
}

/// What a consumer samples from the simulation at its own cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub tick: u64,
    pub metrics: SimMetrics,
    pub registry_entries: Vec<RegistryEntry>,
    pub event_count: usize,
    pub anchors: Vec<Anchor>,
}
