//! Invariant registry: an append-on-birth, prune-on-death index over the
//! living dynamic invariants. Numeric state stays in the entity store.

use ovel_data::{LifecyclePhase, RegistryEntry};
use serde::{Deserialize, Serialize};

/// Ages at which bloom, mature and elder begin.
pub type PhaseBreakpoints = [u64; 3];

pub const DEFAULT_BREAKPOINTS: PhaseBreakpoints = [45, 110, 145];

#[must_use]
pub fn phase_for_age(age: u64, breakpoints: &PhaseBreakpoints) -> LifecyclePhase {
    let [bloom, mature, elder] = *breakpoints;
    if age >= elder {
        LifecyclePhase::Elder
    } else if age >= mature {
        LifecyclePhase::Mature
    } else if age >= bloom {
        LifecyclePhase::Bloom
    } else {
        LifecyclePhase::Spark
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvariantRegistry {
    entries: Vec<RegistryEntry>,
    breakpoints: PhaseBreakpoints,
    total_births: u64,
    total_deaths: u64,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINTS)
    }
}

impl InvariantRegistry {
    #[must_use]
    pub fn new(breakpoints: PhaseBreakpoints) -> Self {
        Self {
            entries: Vec::new(),
            breakpoints,
            total_births: 0,
            total_deaths: 0,
        }
    }

    pub fn on_birth(&mut self, id: &str, tick: u64) {
        if self.entries.iter().any(|e| e.id == id) {
            tracing::warn!(id, "Duplicate registry birth ignored");
            return;
        }
        self.entries.push(RegistryEntry {
            id: id.to_string(),
            birth_tick: tick,
            phase: LifecyclePhase::Spark,
        });
        self.total_births += 1;
    }

    /// Returns whether an entry was removed.
    pub fn on_death(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() < before;
        if removed {
            self.total_deaths += 1;
        }
        removed
    }

    /// Owned copy in birth order.
    #[must_use]
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.entries.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn lifecycle_phase(&self, entry: &RegistryEntry, tick: u64) -> LifecyclePhase {
        phase_for_age(tick.saturating_sub(entry.birth_tick), &self.breakpoints)
    }

    /// Re-derives every phase for `tick`.
    pub fn refresh(&mut self, tick: u64) {
        let breakpoints = self.breakpoints;
        for entry in &mut self.entries {
            entry.phase = phase_for_age(tick.saturating_sub(entry.birth_tick), &breakpoints);
        }
    }

    #[must_use]
    pub fn breakpoints(&self) -> PhaseBreakpoints {
        self.breakpoints
    }

    #[must_use]
    pub fn total_births(&self) -> u64 {
        self.total_births
    }

    #[must_use]
    pub fn total_deaths(&self) -> u64 {
        self.total_deaths
    }
}
