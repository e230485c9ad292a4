pub mod macros;

use ovel_lib::{Seed, Simulation, StagePreset, Vec2, DEFAULT_DELTA, DEFAULT_SEED};

type ProbeOverride = (usize, Vec2, Vec2);

#[allow(dead_code)]
pub struct SimBuilder {
    preset: StagePreset,
    seed: Seed,
    probes: Vec<ProbeOverride>,
}

#[allow(dead_code)]
impl SimBuilder {
    pub fn new() -> Self {
        Self {
            preset: StagePreset::default(),
            seed: Seed::new(DEFAULT_SEED),
            probes: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Seed::new(seed);
        self
    }

    pub fn with_preset<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut StagePreset),
    {
        modifier(&mut self.preset);
        self
    }

    pub fn with_probe_count(mut self, count: usize) -> Self {
        self.preset.probes.count = count;
        self
    }

    pub fn with_probe(mut self, index: usize, position: Vec2, velocity: Vec2) -> Self {
        self.probes.push((index, position, velocity));
        self
    }

    /// Returns the simulation together with the preset it was built from, so
    /// tests can keep stepping with the same parameters.
    pub fn build(self) -> (Simulation, StagePreset) {
        let mut sim =
            Simulation::with_preset(self.seed, &self.preset).expect("Failed to build simulation");
        for (index, position, velocity) in self.probes {
            sim.set_probe_state(index, position, velocity)
                .expect("Failed to place probe");
        }
        (sim, self.preset)
    }
}

/// Steps until `predicate` holds or `max_ticks` elapse. Returns whether the
/// predicate was met.
#[allow(dead_code)]
pub fn run_until<F>(
    sim: &mut Simulation,
    preset: &StagePreset,
    max_ticks: u64,
    mut predicate: F,
) -> bool
where
    F: FnMut(&Simulation) -> bool,
{
    for _ in 0..max_ticks {
        sim.step(preset, DEFAULT_DELTA).expect("Step failed");
        if predicate(sim) {
            return true;
        }
    }
    false
}
