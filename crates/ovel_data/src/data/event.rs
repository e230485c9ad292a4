use super::geometry::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    EnergyDepleted,
    Unstable,
}

/// Something notable that happened during a single step.
///
/// The simulation only keeps the events of the most recent step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SimEvent {
    Birth {
        id: String,
        tick: u64,
        position: Vec2,
        energy: f64,
    },
    Death {
        id: String,
        tick: u64,
        age: u64,
        cause: DeathCause,
    },
    Merge {
        survivor: u64,
        absorbed: u64,
        tick: u64,
    },
    ProbeClamp {
        probe: usize,
        tick: u64,
    },
    WorldClamp {
        tick: u64,
        from_radius: f64,
        to_radius: f64,
    },
}

impl SimEvent {
    #[must_use]
    pub fn tick(&self) -> u64 {
        match self {
            Self::Birth { tick, .. }
            | Self::Death { tick, .. }
            | Self::Merge { tick, .. }
            | Self::ProbeClamp { tick, .. }
            | Self::WorldClamp { tick, .. } => *tick,
        }
    }

    #[must_use]
    pub fn is_birth(&self) -> bool {
        matches!(self, Self::Birth { .. })
    }

    #[must_use]
    pub fn is_death(&self) -> bool {
        matches!(self, Self::Death { .. })
    }
}
