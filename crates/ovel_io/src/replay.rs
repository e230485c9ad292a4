//! Replay manifests.
//!
//! Live state is never persisted. A run is reproduced from its seed, the
//! preset used both to build and to step it, the fixed delta and the number of
//! ticks. The digest of the final state lets a later run check it landed on
//! the same trajectory.

use crate::error::{IoError, Result};
use crate::serialization::{read_json_file, write_json_file};
use chrono::Utc;
use ovel_core::{Seed, Simulation, StagePreset};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayManifest {
    pub seed: Seed,
    pub ticks: u64,
    pub delta: f64,
    pub preset: StagePreset,
    pub preset_fingerprint: String,
    pub state_digest: String,
    pub created_at: String,
}

/// Outcome of re-running a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayCheck {
    pub expected: String,
    pub actual: String,
}

impl ReplayCheck {
    #[must_use]
    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

impl ReplayManifest {
    /// Describes `sim`, which must have been built with `preset` and stepped
    /// with it at a constant `delta` ever since.
    #[must_use]
    pub fn record(sim: &Simulation, preset: &StagePreset, delta: f64) -> Self {
        Self {
            seed: sim.seed(),
            ticks: sim.tick(),
            delta,
            preset: preset.clone(),
            preset_fingerprint: preset.fingerprint(),
            state_digest: sim.state_digest(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json_file(self, path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manifest: Self = read_json_file(path)?;
        if manifest.preset.fingerprint() != manifest.preset_fingerprint {
            return Err(IoError::validation(
                "preset does not match its recorded fingerprint",
            ));
        }
        Ok(manifest)
    }

    /// Rebuilds the simulation by re-stepping from the seed.
    pub fn replay(&self) -> Result<Simulation> {
        let mut sim = Simulation::with_preset(self.seed, &self.preset)?;
        sim.run(&self.preset, self.delta, self.ticks)?;
        Ok(sim)
    }

    pub fn verify(&self) -> Result<ReplayCheck> {
        let sim = self.replay()?;
        let check = ReplayCheck {
            expected: self.state_digest.clone(),
            actual: sim.state_digest(),
        };
        if !check.matches() {
            tracing::warn!(
                seed = %self.seed,
                ticks = self.ticks,
                "Replay diverged from recorded digest"
            );
        }
        Ok(check)
    }
}
