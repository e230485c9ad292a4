//! # Ovel Data
//!
//! Plain data model shared by the simulation core, the I/O layer and the
//! command line tools. Nothing in here owns behavior beyond small geometric
//! helpers; all dynamics live in `ovel_core`.

pub mod data;

pub use data::entity::{Anchor, Basin, DynamicInvariant, Probe};
pub use data::event::{DeathCause, SimEvent};
pub use data::geometry::{Vec2, WorldCoord};
pub use data::metrics::SimMetrics;
pub use data::registry::{LifecyclePhase, RegistryEntry};
pub use data::state::{Globals, Telemetry};
