//! The simulation value: owned state plus the single mutator, [`Simulation::step`].
//!
//! Queries borrow the simulation immutably, so a caller can never observe a
//! half-applied step. Owned copies are available through [`Simulation::snapshot`]
//! and [`Simulation::telemetry`].

use crate::config::{FieldConfig, StagePreset};
use crate::containment::{Containment, ContainmentReport};
use crate::error::{Result, SimError};
use crate::field::{FieldGrid, FieldSources, WorldBounds};
use crate::registry::InvariantRegistry;
use crate::rng::{Seed, SimRng};
use crate::store::EntityStore;
use crate::systems;
use ovel_data::{
    Anchor, Basin, DynamicInvariant, Globals, Probe, RegistryEntry, SimEvent, SimMetrics,
    Telemetry, Vec2,
};
use serde::{Deserialize, Serialize};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 424_242;

/// Step delta used by the reference render loop.
pub const DEFAULT_DELTA: f64 = 0.008;

/// Owned copy of everything observable about a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSnapshot {
    pub seed: Seed,
    pub globals: Globals,
    pub anchors: Vec<Anchor>,
    pub probes: Vec<Probe>,
    pub basins: Vec<Basin>,
    pub invariants: Vec<DynamicInvariant>,
    pub events: Vec<SimEvent>,
    pub metrics: SimMetrics,
    pub registry_entries: Vec<RegistryEntry>,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    seed: Seed,
    globals: Globals,
    store: EntityStore,
    registry: InvariantRegistry,
    containment: Containment,
    sources: FieldSources,
    /// Kernel parameters the sources were last built with.
    field: FieldConfig,
    metrics: SimMetrics,
    rng: SimRng,
    candidates: Vec<Vec2>,
}

/// Builds a simulation with the default stage.
#[must_use]
pub fn create_simulation(seed: impl Into<Seed>) -> Simulation {
    Simulation::new(seed)
}

impl Simulation {
    /// Builds a simulation with the default stage.
    #[must_use]
    pub fn new(seed: impl Into<Seed>) -> Self {
        Self::build(seed.into(), &StagePreset::default())
    }

    /// Builds a simulation from the construction-time fields of `preset`:
    /// anchor layout, probe count and spread, base radius and breakpoints.
    pub fn with_preset(seed: impl Into<Seed>, preset: &StagePreset) -> Result<Self> {
        preset.validate()?;
        Ok(Self::build(seed.into(), preset))
    }

    fn build(seed: Seed, preset: &StagePreset) -> Self {
        let mut rng = SimRng::new(seed);

        let anchors: Vec<Anchor> = preset
            .anchors
            .layout
            .iter()
            .map(|spec| Anchor {
                id: spec.id.clone(),
                position: Vec2::new(spec.x, spec.y) + rng.in_disk(preset.anchors.jitter),
            })
            .collect();

        let radius = preset.containment.radius;
        let spread = radius * preset.probes.initial_spread;
        let probes: Vec<Probe> = (0..preset.probes.count)
            .map(|_| Probe::at(rng.in_disk(spread), Vec2::ZERO))
            .collect();

        let store = EntityStore::new(anchors, probes);
        let containment = Containment::new(radius, store.probe_extent());
        let sources = FieldSources::from_store(&store, &preset.field);
        let report = ContainmentReport {
            radius,
            ..Default::default()
        };
        let metrics = systems::metrics::compute(&store, &report, preset.budget.energy_budget);

        tracing::debug!(
            seed = seed.value(),
            probes = store.probes.len(),
            anchors = store.anchors.len(),
            sources = sources.source_count(),
            "Simulation created"
        );

        Self {
            seed,
            globals: Globals::default(),
            store,
            registry: InvariantRegistry::new(preset.lifecycle.phase_breakpoints),
            containment,
            sources,
            field: preset.field.clone(),
            metrics,
            rng,
            candidates: Vec::new(),
        }
    }

    /// Advances the simulation by one tick of `delta` simulated time.
    ///
    /// Inputs are checked before any state is touched, so a rejected call
    /// leaves the simulation unchanged.
    pub fn step(&mut self, preset: &StagePreset, delta: f64) -> Result<()> {
        if !delta.is_finite() || delta < 0.0 {
            tracing::warn!(delta, "Rejected step delta");
            return Err(SimError::InvalidDelta(delta));
        }
        preset.validate()?;

        self.globals.tick += 1;
        self.globals.time += delta;
        let tick = self.globals.tick;
        let mut events = Vec::new();

        self.sources.rebuild(&self.store, &preset.field);
        self.field = preset.field.clone();

        systems::probes::steer(
            &mut self.store,
            &self.sources,
            &preset.probes,
            &mut self.rng,
            delta,
            &mut self.candidates,
        );
        let report = systems::probes::confine(
            &mut self.store,
            &mut self.containment,
            &preset.containment,
            &self.candidates,
            tick,
            &mut events,
        );
        self.sources.rebuild_probes(&self.store, &preset.field);
        self.sources.rebuild_invariants(&self.store, &preset.field);

        systems::basins::update(&mut self.store, &self.sources, &preset.basins, tick, &mut events);

        systems::lifecycle::births(
            &mut self.store,
            &self.sources,
            &mut self.registry,
            &preset.lifecycle,
            tick,
            &mut events,
        );
        systems::lifecycle::deaths(
            &mut self.store,
            &mut self.registry,
            &preset.lifecycle,
            tick,
            &mut events,
        );
        systems::lifecycle::feedback(
            &mut self.store,
            &self.sources,
            &preset.lifecycle,
            preset.budget.energy_budget,
            self.registry.breakpoints()[2],
            tick,
            delta,
        );
        self.sources.rebuild_invariants(&self.store, &preset.field);

        self.metrics = systems::metrics::compute(&self.store, &report, preset.budget.energy_budget);
        self.registry.refresh(tick);
        let births = events.iter().filter(|e| e.is_birth()).count();
        let deaths = events.iter().filter(|e| e.is_death()).count();
        if births + deaths > 0 {
            tracing::debug!(
                tick,
                births,
                deaths,
                living = self.store.invariants.len(),
                "Population changed"
            );
        }
        self.store.events = events;

        if !self.store.is_finite() || !self.metrics.is_finite() {
            tracing::error!(tick, "Non-finite simulation state");
            debug_assert!(false, "non-finite simulation state at tick {tick}");
        }
        Ok(())
    }

    /// Runs `ticks` steps with the same preset and delta.
    pub fn run(&mut self, preset: &StagePreset, delta: f64, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step(preset, delta)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn seed(&self) -> Seed {
        self.seed
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.globals.tick
    }

    #[must_use]
    pub fn globals(&self) -> Globals {
        self.globals
    }

    /// Presentation hint only; never read by the dynamics.
    pub fn set_viewport_min_px(&mut self, px: f64) {
        if px.is_finite() && px > 0.0 {
            self.globals.viewport_min_px = px;
        } else {
            tracing::warn!(px, "Ignored viewport size");
        }
    }

    #[must_use]
    pub fn density(&self, p: Vec2) -> f64 {
        self.sources.density(p)
    }

    #[must_use]
    pub fn energy(&self, p: Vec2) -> f64 {
        self.sources.energy(p)
    }

    #[must_use]
    pub fn field_sources(&self) -> &FieldSources {
        &self.sources
    }

    /// Samples density and energy on a pixel lattice into `grid`.
    pub fn sample_field(&self, grid: &mut FieldGrid, bounds: &WorldBounds, resolution: usize) {
        grid.fill(&self.sources, bounds, resolution);
    }

    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.store.anchors
    }

    #[must_use]
    pub fn probes(&self) -> &[Probe] {
        &self.store.probes
    }

    #[must_use]
    pub fn basins(&self) -> &[Basin] {
        &self.store.basins
    }

    #[must_use]
    pub fn invariants(&self) -> &[DynamicInvariant] {
        &self.store.invariants
    }

    /// Events of the most recent step.
    #[must_use]
    pub fn events(&self) -> &[SimEvent] {
        &self.store.events
    }

    #[must_use]
    pub fn metrics(&self) -> &SimMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    #[must_use]
    pub fn registry(&self) -> &InvariantRegistry {
        &self.registry
    }

    #[must_use]
    pub fn registry_entries(&self) -> Vec<RegistryEntry> {
        self.registry.entries()
    }

    #[must_use]
    pub fn significant_basins(&self, limit: usize) -> Vec<Basin> {
        self.store.significant_basins(limit)
    }

    #[must_use]
    pub fn top_invariants(&self, limit: usize) -> Vec<DynamicInvariant> {
        self.store.top_invariants(limit)
    }

    #[must_use]
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            tick: self.globals.tick,
            metrics: self.metrics,
            registry_entries: self.registry.entries(),
            event_count: self.store.events.len(),
            anchors: self.store.anchors.clone(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            seed: self.seed,
            globals: self.globals,
            anchors: self.store.anchors.clone(),
            probes: self.store.probes.clone(),
            basins: self.store.basins.clone(),
            invariants: self.store.invariants.clone(),
            events: self.store.events.clone(),
            metrics: self.metrics,
            registry_entries: self.registry.entries(),
        }
    }

    /// SHA-256 over the full observable state. Equal digests mean equal
    /// trajectories up to this tick.
    #[must_use]
    pub fn state_digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.snapshot()).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Places a probe directly. Meant for seeding scenarios in tests and tools.
    pub fn set_probe_state(&mut self, index: usize, position: Vec2, velocity: Vec2) -> Result<()> {
        let count = self.store.probes.len();
        let probe = self
            .store
            .probes
            .get_mut(index)
            .ok_or(SimError::ProbeOutOfRange { index, count })?;
        if !position.is_finite() || !velocity.is_finite() {
            return Err(SimError::NonFinite("probe state"));
        }
        let age = probe.age;
        *probe = Probe {
            age,
            ..Probe::at(position, velocity)
        };
        self.containment.record_extent(self.store.probe_extent());
        self.sources.rebuild_probes(&self.store, &self.field);
        Ok(())
    }
}
