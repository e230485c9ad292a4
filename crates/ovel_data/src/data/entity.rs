use super::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed seed point shaping the field. Immutable for the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: String,
    pub position: Vec2,
}

/// Mobile sampling particle whose trajectory traces the field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Probe {
    pub position: Vec2,
    pub previous_position: Vec2,
    pub velocity: Vec2,
    /// Magnitude of the last step's displacement.
    pub speed: f64,
    pub age: u64,
}

impl Probe {
    #[must_use]
    pub fn at(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            previous_position: position,
            velocity,
            speed: 0.0,
            age: 0,
        }
    }
}

/// Density accumulation site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basin {
    /// Monotonic; a lower id was created earlier.
    pub id: u64,
    pub position: Vec2,
    /// Occupancy. Grows by one per capture and decays while idle.
    pub count: f64,
    /// Consecutive steps the sampled density here stayed above the birth threshold.
    pub dwell: u32,
    /// Whether anything was captured during the current step.
    pub captured: bool,
}

/// Emergent structure born from sustained local field density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicInvariant {
    pub id: String,
    pub position: Vec2,
    pub energy: f64,
    pub stability: f64,
    pub dynamic: bool,
    pub birth_tick: u64,
    /// Consecutive steps spent below a death threshold.
    pub low_streak: u32,
}

impl DynamicInvariant {
    #[must_use]
    pub fn age(&self, tick: u64) -> u64 {
        tick.saturating_sub(self.birth_tick)
    }
}
