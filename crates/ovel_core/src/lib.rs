//! # Ovel Core
//!
//! Deterministic, seeded continuous-field particle simulation.
//!
//! This crate contains the simulation logic, including:
//! - A Gaussian density/energy field sampled from anchors, probes and invariants
//! - Probe motion steered by the field gradient, with disk containment
//! - Basin occupancy tracking (capture, creation, merge, decay)
//! - The birth, feedback and death lifecycle of dynamic invariants
//! - An invariant registry with age-derived lifecycle phases
//! - Published metrics, step timing and structured logging
//!
//! ## Architecture
//!
//! A [`Simulation`] owns an [`store::EntityStore`] (the single source of
//! truth), an [`registry::InvariantRegistry`] derived from it, and one
//! ChaCha8 stream seeded at construction. `step` is the only mutator and runs
//! the systems in [`systems`] in a fixed order, so the same seed and the same
//! sequence of presets and deltas always produce the same trajectory.
//!
//! ## Example
//!
//! ```
//! use ovel_core::{Simulation, StagePreset, DEFAULT_DELTA};
//!
//! let preset = StagePreset::default();
//! let mut sim = Simulation::new(424_242u64);
//! sim.step(&preset, DEFAULT_DELTA).unwrap();
//!
//! assert_eq!(sim.tick(), 1);
//! assert_eq!(sim.metrics().living_invariants, 0);
//! ```

/// Stage presets and their validation
pub mod config;
/// Disk containment with an adaptive radius
pub mod containment;
/// Step timing counters and logging setup
pub mod diagnostics;
pub mod error;
/// Density and energy field sampling
pub mod field;
/// Built-in stages
pub mod presets;
/// Registry of living dynamic invariants
pub mod registry;
pub mod rng;
pub mod simulation;
/// Entity storage
pub mod store;
/// Step systems
pub mod systems;

pub use config::{ColorMode, StagePreset};
pub use error::SimError;
pub use field::{FieldGrid, FieldSources, WorldBounds};
pub use presets::{preset_by_name, stage_presets};
pub use registry::InvariantRegistry;
pub use rng::Seed;
pub use simulation::{create_simulation, SimSnapshot, Simulation, DEFAULT_DELTA, DEFAULT_SEED};
