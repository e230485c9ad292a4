//! # Ovel
//!
//! Library facade over the Ovel workspace, the headless runner behind the
//! `ovel` binary, and the browser binding used by the canvas renderer.

#[cfg(not(target_arch = "wasm32"))]
pub mod runner;

pub use ovel_core::{
    create_simulation, preset_by_name, stage_presets, FieldGrid, Seed, SimError, SimSnapshot,
    Simulation, StagePreset, WorldBounds, DEFAULT_DELTA, DEFAULT_SEED,
};
pub use ovel_data::{
    Anchor, Basin, DynamicInvariant, LifecyclePhase, Probe, RegistryEntry, SimEvent, SimMetrics,
    Telemetry, Vec2,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Simulation handle for the browser render loop. The caller steps once per
/// animation frame and reads the field back as flat `Float32Array`s.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct WasmSimulation {
    sim: Simulation,
    preset: StagePreset,
    grid: FieldGrid,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl WasmSimulation {
    /// Builds a simulation. `seed` must be a finite integer.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, stage: Option<String>) -> Result<WasmSimulation, JsValue> {
        console_error_panic_hook::set_once();

        let seed = Seed::try_from(seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let preset = match stage {
            Some(name) => preset_by_name(&name)
                .ok_or_else(|| SimError::invalid_preset(format!("Unknown stage '{name}'")))
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => StagePreset::default(),
        };
        let sim =
            Simulation::with_preset(seed, &preset).map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(WasmSimulation {
            sim,
            preset,
            grid: FieldGrid::new(),
        })
    }

    pub fn step(&mut self, delta: f64) -> Result<(), JsValue> {
        self.sim
            .step(&self.preset, delta)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn tick(&self) -> f64 {
        self.sim.tick() as f64
    }

    pub fn density(&self, x: f64, y: f64) -> f64 {
        self.sim.density(Vec2::new(x, y))
    }

    pub fn energy(&self, x: f64, y: f64) -> f64 {
        self.sim.energy(Vec2::new(x, y))
    }

    pub fn set_viewport_min_px(&mut self, px: f64) {
        self.sim.set_viewport_min_px(px);
    }

    /// Fills the density and energy grids for a `width` by `height` pixel
    /// viewport and returns the number of columns.
    pub fn sample_field(&mut self, width: f64, height: f64, resolution: usize) -> usize {
        let bounds = WorldBounds::new(width, height);
        self.sim.sample_field(&mut self.grid, &bounds, resolution);
        self.grid.cols
    }

    pub fn density_grid(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.grid.density.as_slice())
    }

    pub fn energy_grid(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.grid.energy.as_slice())
    }

    /// Probe positions as interleaved `[x, y, prev_x, prev_y, ...]`.
    pub fn probe_positions(&self) -> js_sys::Float64Array {
        let flat: Vec<f64> = self
            .sim
            .probes()
            .iter()
            .flat_map(|p| {
                [
                    p.position.x,
                    p.position.y,
                    p.previous_position.x,
                    p.previous_position.y,
                ]
            })
            .collect();
        js_sys::Float64Array::from(flat.as_slice())
    }

    /// Overlay state (anchors, top basins, top invariants) as JSON.
    pub fn overlay_json(&self) -> Result<String, JsValue> {
        let display = &self.preset.display;
        let overlay = serde_json::json!({
            "anchors": self.sim.anchors(),
            "basins": self.sim.significant_basins(display.basin_render_limit),
            "invariants": self.sim.invariants(),
            "labelled": self.sim.top_invariants(display.label_limit),
            "registry": self.sim.registry_entries(),
        });
        serde_json::to_string(&overlay).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn telemetry_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.sim.telemetry()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
