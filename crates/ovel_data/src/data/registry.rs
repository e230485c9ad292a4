use serde::{Deserialize, Serialize};
use std::fmt;

/// Age bracket of a dynamic invariant. Ordered: a phase never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecyclePhase {
    Spark,
    Bloom,
    Mature,
    Elder,
}

impl LifecyclePhase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Spark => "spark",
            Self::Bloom => "bloom",
            Self::Mature => "mature",
            Self::Elder => "elder",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Back-reference to a living dynamic invariant. Carries no numeric state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub id: String,
    pub birth_tick: u64,
    pub phase: LifecyclePhase,
}
