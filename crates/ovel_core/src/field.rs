//! Continuous density and energy field.
//!
//! Every source contributes a Gaussian kernel `w * exp(-d^2 / (2 sigma^2))`.
//! Sources are copied into flat structure-of-arrays blocks whenever the store
//! changes, so sampling is a tight loop over `f64` slices with no allocation.
//!
//! - `density` saturates the raw sum as `1 - exp(-raw)`, bounded in `[0, 1)`
//!   for any number of sources.
//! - `energy` is `tanh(hot_gain * hot - cold_weight * cold)` where `hot` is the
//!   invariant block and `cold` the anchor block.
//! - `support` is the saturated anchor and probe contribution. Invariants read
//!   it for feedback so they never feed on themselves.
//! - `structural_gradient` is the analytic gradient of the anchor and
//!   invariant blocks, which steers probes.

use crate::config::FieldConfig;
use crate::store::EntityStore;
use ovel_data::Vec2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
struct KernelBlock {
    xs: Vec<f64>,
    ys: Vec<f64>,
    weights: Vec<f64>,
    inv_two_sigma2: f64,
}

impl KernelBlock {
    fn reset(&mut self, sigma: f64) {
        self.xs.clear();
        self.ys.clear();
        self.weights.clear();
        self.inv_two_sigma2 = 1.0 / (2.0 * sigma * sigma);
    }

    fn push(&mut self, position: Vec2, weight: f64) {
        self.xs.push(position.x);
        self.ys.push(position.y);
        self.weights.push(weight);
    }

    #[inline]
    fn sum(&self, p: Vec2) -> f64 {
        let k = self.inv_two_sigma2;
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.weights)
            .map(|((&x, &y), &w)| {
                let dx = p.x - x;
                let dy = p.y - y;
                w * (-(dx * dx + dy * dy) * k).exp()
            })
            .sum()
    }

    /// Points toward the sources. A point sitting on a source gets no pull
    /// from it.
    #[inline]
    fn gradient(&self, p: Vec2) -> Vec2 {
        let k = self.inv_two_sigma2;
        let mut gx = 0.0;
        let mut gy = 0.0;
        for ((&x, &y), &w) in self.xs.iter().zip(&self.ys).zip(&self.weights) {
            let dx = x - p.x;
            let dy = y - p.y;
            let e = w * (-(dx * dx + dy * dy) * k).exp();
            gx += 2.0 * k * e * dx;
            gy += 2.0 * k * e * dy;
        }
        Vec2::new(gx, gy)
    }

    fn len(&self) -> usize {
        self.weights.len()
    }
}

/// Flattened copy of every field source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSources {
    anchors: KernelBlock,
    probes: KernelBlock,
    invariants: KernelBlock,
    hot_gain: f64,
    cold_weight: f64,
}

impl FieldSources {
    #[must_use]
    pub fn from_store(store: &EntityStore, config: &FieldConfig) -> Self {
        let mut sources = Self::default();
        sources.rebuild(store, config);
        sources
    }

    /// Re-reads the store, reusing the existing buffers.
    pub fn rebuild(&mut self, store: &EntityStore, config: &FieldConfig) {
        self.anchors.reset(config.anchor_sigma);
        for anchor in &store.anchors {
            self.anchors.push(anchor.position, config.anchor_weight);
        }
        self.rebuild_probes(store, config);
        self.rebuild_invariants(store, config);
        self.hot_gain = config.hot_gain;
        self.cold_weight = config.cold_weight;
    }

    pub(crate) fn rebuild_probes(&mut self, store: &EntityStore, config: &FieldConfig) {
        self.probes.reset(config.probe_sigma);
        for probe in &store.probes {
            self.probes.push(probe.position, config.probe_weight);
        }
    }

    pub(crate) fn rebuild_invariants(&mut self, store: &EntityStore, config: &FieldConfig) {
        self.invariants.reset(config.invariant_sigma);
        for inv in &store.invariants {
            self.invariants
                .push(inv.position, config.invariant_weight * inv.energy.max(0.0));
        }
    }

    #[must_use]
    pub fn source_count(&self) -> usize {
        self.anchors.len() + self.probes.len() + self.invariants.len()
    }

    /// Saturated density in `[0, 1)`.
    #[must_use]
    pub fn density(&self, p: Vec2) -> f64 {
        let raw = self.anchors.sum(p) + self.probes.sum(p) + self.invariants.sum(p);
        saturate(raw)
    }

    /// Signed energy in `(-1, 1)`.
    #[must_use]
    pub fn energy(&self, p: Vec2) -> f64 {
        let hot = self.invariants.sum(p);
        let cold = self.anchors.sum(p);
        (self.hot_gain * hot - self.cold_weight * cold).tanh()
    }

    /// Saturated anchor and probe density in `[0, 1)`.
    #[must_use]
    pub fn support(&self, p: Vec2) -> f64 {
        saturate(self.anchors.sum(p) + self.probes.sum(p))
    }

    #[must_use]
    pub fn structural_gradient(&self, p: Vec2) -> Vec2 {
        self.anchors.gradient(p) + self.invariants.gradient(p)
    }
}

#[inline]
fn saturate(raw: f64) -> f64 {
    1.0 - (-raw.max(0.0)).exp()
}

/// Maps viewport pixels to world coordinates. The short screen axis spans
/// `[-1, 1]` and the viewport center is the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub cx: f64,
    pub cy: f64,
}

impl WorldBounds {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let short = width.min(height).max(1.0);
        Self {
            width,
            height,
            scale: 2.0 / short,
            cx: width / 2.0,
            cy: height / 2.0,
        }
    }

    #[must_use]
    pub fn to_world(&self, px: f64, py: f64) -> Vec2 {
        Vec2::new((px - self.cx) * self.scale, (py - self.cy) * self.scale)
    }

    #[must_use]
    pub fn to_screen(&self, p: Vec2) -> (f64, f64) {
        (p.x / self.scale + self.cx, p.y / self.scale + self.cy)
    }

    /// Half extents of the visible world rectangle.
    #[must_use]
    pub fn half_extents(&self) -> (f64, f64) {
        (self.width * self.scale / 2.0, self.height * self.scale / 2.0)
    }
}

/// Density and energy sampled on a pixel lattice.
///
/// Cell `(col, row)` samples the world point under pixel
/// `(col * resolution, row * resolution)`. Buffers are reused across fills.
#[derive(Debug, Clone, Default)]
pub struct FieldGrid {
    pub cols: usize,
    pub rows: usize,
    pub resolution: usize,
    pub density: Vec<f32>,
    pub energy: Vec<f32>,
}

impl FieldGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&mut self, sources: &FieldSources, bounds: &WorldBounds, resolution: usize) {
        let resolution = resolution.max(1);
        let cols = (bounds.width.max(0.0) as usize).div_ceil(resolution);
        let rows = (bounds.height.max(0.0) as usize).div_ceil(resolution);
        self.cols = cols;
        self.rows = rows;
        self.resolution = resolution;
        self.density.resize(cols * rows, 0.0);
        self.energy.resize(cols * rows, 0.0);
        if cols == 0 {
            return;
        }

        let fill_row = |row: usize, density: &mut [f32], energy: &mut [f32]| {
            let py = (row * resolution) as f64;
            for col in 0..cols {
                let p = bounds.to_world((col * resolution) as f64, py);
                density[col] = sources.density(p) as f32;
                energy[col] = sources.energy(p) as f32;
            }
        };

        #[cfg(feature = "parallel")]
        self.density
            .par_chunks_mut(cols)
            .zip(self.energy.par_chunks_mut(cols))
            .enumerate()
            .for_each(|(row, (d, e))| fill_row(row, d, e));

        #[cfg(not(feature = "parallel"))]
        self.density
            .chunks_mut(cols)
            .zip(self.energy.chunks_mut(cols))
            .enumerate()
            .for_each(|(row, (d, e))| fill_row(row, d, e));
    }

    #[must_use]
    pub fn density_at(&self, col: usize, row: usize) -> Option<f32> {
        (col < self.cols && row < self.rows).then(|| self.density[row * self.cols + col])
    }

    #[must_use]
    pub fn energy_at(&self, col: usize, row: usize) -> Option<f32> {
        (col < self.cols && row < self.rows).then(|| self.energy[row * self.cols + col])
    }
}
