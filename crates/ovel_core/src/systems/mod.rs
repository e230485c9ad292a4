//! Step systems, run by `Simulation::step` in this order:
//!
//! 1. [`probes::steer`] integrates probe velocities into candidate positions.
//! 2. [`probes::confine`] adjusts the containment radius and clamps candidates.
//! 3. [`basins::update`] captures, creates, merges, decays and prunes basins.
//! 4. [`lifecycle::births`] realizes at most one birth per region.
//! 5. [`lifecycle::deaths`] removes invariants that stayed low long enough.
//! 6. [`lifecycle::feedback`] relaxes survivor energy and stability.
//! 7. [`metrics::compute`] derives the published statistics.

pub mod basins;
pub mod lifecycle;
pub mod metrics;
pub mod probes;
