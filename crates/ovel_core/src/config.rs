//! Stage presets: every tunable of the simulation in one serde structure.
//!
//! Kernel shapes, thresholds and dwell lengths are policy choices, not
//! physics. The defaults below are the "void-architecture" stage; all of them
//! can be overridden from TOML, section by section.
//!
//! ## Construction-time vs step-time fields
//!
//! Probe count, initial spread, anchor layout, the base containment radius and
//! the lifecycle breakpoints are read once when a simulation is built. All
//! other fields are read from the preset passed to every step.
//!
//! ## Example preset file
//!
//! ```toml
//! name = "dense-probes"
//!
//! [probes]
//! count = 320
//!
//! [lifecycle]
//! dwell_window = 40
//! ```

use serde::{Deserialize, Serialize};

/// Falloff kernels feeding the density and energy field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub anchor_weight: f64,
    pub anchor_sigma: f64,
    pub probe_weight: f64,
    pub probe_sigma: f64,
    /// Kernel weight per unit of invariant energy.
    pub invariant_weight: f64,
    pub invariant_sigma: f64,
    pub hot_gain: f64,
    pub cold_weight: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            anchor_weight: 1.0,
            anchor_sigma: 0.25,
            probe_weight: 0.02,
            probe_sigma: 0.08,
            invariant_weight: 0.04,
            invariant_sigma: 0.12,
            hot_gain: 2.0,
            cold_weight: 0.6,
        }
    }
}

/// Probe population and motion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    pub count: usize,
    /// Fraction of the containment radius used for initial placement.
    pub initial_spread: f64,
    pub damping: f64,
    pub gradient_gain: f64,
    pub swirl_gain: f64,
    pub noise_gain: f64,
    pub max_speed: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            count: 200,
            initial_spread: 0.85,
            damping: 0.92,
            gradient_gain: 6.0,
            swirl_gain: 3.0,
            noise_gain: 30.0,
            max_speed: 3.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnchorSpec {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl AnchorSpec {
    #[must_use]
    pub fn new(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnchorConfig {
    pub layout: Vec<AnchorSpec>,
    /// Seeded displacement applied to every anchor at construction.
    pub jitter: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            layout: vec![AnchorSpec::new("B", -0.38, 0.12), AnchorSpec::new("Ci", 0.42, -0.18)],
            jitter: 0.04,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BasinConfig {
    pub capture_radius: f64,
    pub creation_threshold: f64,
    /// Multiplier applied to the count of a basin that captured nothing.
    pub decay: f64,
    pub prune_below: f64,
    pub max_count: f64,
    pub merge_radius: f64,
    /// How far a captured probe pulls its basin toward itself.
    pub drift: f64,
    pub max_basins: usize,
    pub occupancy_smoothing: f64,
}

impl Default for BasinConfig {
    fn default() -> Self {
        Self {
            capture_radius: 0.06,
            creation_threshold: 0.30,
            decay: 0.96,
            prune_below: 0.5,
            max_count: 400.0,
            merge_radius: 0.035,
            drift: 0.02,
            max_basins: 64,
            occupancy_smoothing: 0.1,
        }
    }
}

/// Birth, death and feedback rules for dynamic invariants.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LifecycleConfig {
    pub birth_threshold: f64,
    /// Steps the density must stay above `birth_threshold` before a birth.
    pub dwell_window: u32,
    /// Side of the square region that may realize at most one birth per step.
    pub region_size: f64,
    pub exclusion_radius: f64,
    pub birth_energy_gain: f64,
    pub max_invariants: usize,
    pub death_energy: f64,
    pub death_stability: f64,
    /// Consecutive low steps before an invariant is removed.
    pub death_hysteresis: u32,
    pub feedback_gain: f64,
    pub sustain_level: f64,
    pub stability_rate: f64,
    pub max_energy: f64,
    /// Energy upkeep of elders per unit time, scaled by time spent as an
    /// elder over the elder breakpoint.
    pub senescence_rate: f64,
    /// Ages (in ticks) at which bloom, mature and elder begin.
    pub phase_breakpoints: [u64; 3],
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            birth_threshold: 0.45,
            dwell_window: 24,
            region_size: 0.25,
            exclusion_radius: 0.15,
            birth_energy_gain: 8.0,
            max_invariants: 24,
            death_energy: 0.5,
            death_stability: 0.2,
            death_hysteresis: 30,
            feedback_gain: 4.0,
            sustain_level: 0.35,
            stability_rate: 2.0,
            max_energy: 25.0,
            senescence_rate: 4.0,
            phase_breakpoints: [45, 110, 145],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ContainmentConfig {
    pub radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Let the active radius follow the probe extent.
    pub adaptive: bool,
    pub boundary_margin: f64,
    pub radius_rate: f64,
    pub radius_tolerance: f64,
}

impl Default for ContainmentConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            min_radius: 0.8,
            max_radius: 1.2,
            adaptive: true,
            boundary_margin: 0.05,
            radius_rate: 0.05,
            radius_tolerance: 0.01,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BudgetConfig {
    pub energy_budget: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            energy_budget: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Energy,
    Density,
}

/// Presentation switches. Never read by the dynamics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_mode: ColorMode,
    pub show_probes: bool,
    pub show_basins: bool,
    pub basin_render_limit: usize,
    pub label_limit: usize,
    pub telemetry_every: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Energy,
            show_probes: true,
            show_basins: true,
            basin_render_limit: 10,
            label_limit: 5,
            telemetry_every: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StagePreset {
    pub name: String,
    pub field: FieldConfig,
    pub probes: ProbeConfig,
    pub anchors: AnchorConfig,
    pub basins: BasinConfig,
    pub lifecycle: LifecycleConfig,
    pub containment: ContainmentConfig,
    pub budget: BudgetConfig,
    pub display: DisplayConfig,
}

impl Default for StagePreset {
    fn default() -> Self {
        Self {
            name: crate::presets::DEFAULT_STAGE.to_string(),
            field: FieldConfig::default(),
            probes: ProbeConfig::default(),
            anchors: AnchorConfig::default(),
            basins: BasinConfig::default(),
            lifecycle: LifecycleConfig::default(),
            containment: ContainmentConfig::default(),
            budget: BudgetConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl StagePreset {
    /// Validates all preset parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` describing the
    /// first violated rule.
    pub fn validate(&self) -> anyhow::Result<()> {
        let f = &self.field;
        anyhow::ensure!(
            all_finite(&[
                f.anchor_weight,
                f.anchor_sigma,
                f.probe_weight,
                f.probe_sigma,
                f.invariant_weight,
                f.invariant_sigma,
                f.hot_gain,
                f.cold_weight,
            ]),
            "Field parameters must be finite"
        );
        anyhow::ensure!(
            f.anchor_weight >= 0.0 && f.probe_weight >= 0.0 && f.invariant_weight >= 0.0,
            "Kernel weights must be non-negative"
        );
        anyhow::ensure!(
            f.anchor_sigma > 0.0 && f.probe_sigma > 0.0 && f.invariant_sigma > 0.0,
            "Kernel widths must be positive"
        );

        let p = &self.probes;
        anyhow::ensure!(p.count <= 20_000, "Probe count too large (max 20000)");
        anyhow::ensure!(
            all_finite(&[
                p.initial_spread,
                p.damping,
                p.gradient_gain,
                p.swirl_gain,
                p.noise_gain,
                p.max_speed
            ]),
            "Probe parameters must be finite"
        );
        anyhow::ensure!(
            p.initial_spread > 0.0 && p.initial_spread <= 1.0,
            "Initial spread must be in (0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&p.damping),
            "Probe damping must be in [0.0, 1.0]"
        );
        anyhow::ensure!(p.noise_gain >= 0.0, "Noise gain must be non-negative");
        anyhow::ensure!(p.max_speed > 0.0, "Max probe speed must be positive");

        let a = &self.anchors;
        anyhow::ensure!(
            a.jitter.is_finite() && a.jitter >= 0.0,
            "Anchor jitter must be non-negative"
        );
        for (i, spec) in a.layout.iter().enumerate() {
            anyhow::ensure!(!spec.id.is_empty(), "Anchor #{i} has an empty id");
            anyhow::ensure!(
                spec.x.is_finite() && spec.y.is_finite(),
                "Anchor '{}' position must be finite",
                spec.id
            );
            anyhow::ensure!(
                a.layout[..i].iter().all(|other| other.id != spec.id),
                "Duplicate anchor id '{}'",
                spec.id
            );
        }

        let b = &self.basins;
        anyhow::ensure!(
            all_finite(&[
                b.capture_radius,
                b.creation_threshold,
                b.decay,
                b.prune_below,
                b.max_count,
                b.merge_radius,
                b.drift,
                b.occupancy_smoothing
            ]),
            "Basin parameters must be finite"
        );
        anyhow::ensure!(b.capture_radius > 0.0, "Capture radius must be positive");
        anyhow::ensure!(
            (0.0..1.0).contains(&b.decay),
            "Basin decay must be in [0.0, 1.0)"
        );
        anyhow::ensure!(b.prune_below >= 0.0, "Prune level must be non-negative");
        anyhow::ensure!(b.max_count >= 1.0, "Basin max count must be at least 1");
        anyhow::ensure!(b.merge_radius >= 0.0, "Merge radius must be non-negative");
        anyhow::ensure!(
            (0.0..=1.0).contains(&b.drift),
            "Basin drift must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            b.occupancy_smoothing > 0.0 && b.occupancy_smoothing <= 1.0,
            "Occupancy smoothing must be in (0.0, 1.0]"
        );

        let l = &self.lifecycle;
        anyhow::ensure!(
            all_finite(&[
                l.birth_threshold,
                l.region_size,
                l.exclusion_radius,
                l.birth_energy_gain,
                l.death_energy,
                l.death_stability,
                l.feedback_gain,
                l.sustain_level,
                l.stability_rate,
                l.max_energy,
                l.senescence_rate
            ]),
            "Lifecycle parameters must be finite"
        );
        anyhow::ensure!(
            l.dwell_window >= 2,
            "Dwell window must be at least 2 steps"
        );
        anyhow::ensure!(l.region_size > 0.0, "Region size must be positive");
        anyhow::ensure!(
            l.exclusion_radius >= 0.0,
            "Exclusion radius must be non-negative"
        );
        anyhow::ensure!(l.max_energy > 0.0, "Max energy must be positive");
        anyhow::ensure!(
            l.birth_energy_gain >= 0.0,
            "Birth energy gain must be non-negative"
        );
        anyhow::ensure!(l.death_hysteresis >= 1, "Death hysteresis must be positive");
        anyhow::ensure!(
            l.stability_rate >= 0.0,
            "Stability rate must be non-negative"
        );
        anyhow::ensure!(
            l.senescence_rate >= 0.0,
            "Senescence rate must be non-negative"
        );
        let [bloom, mature, elder] = l.phase_breakpoints;
        anyhow::ensure!(
            bloom < mature && mature < elder,
            "Phase breakpoints must be strictly increasing"
        );

        let c = &self.containment;
        anyhow::ensure!(
            all_finite(&[
                c.radius,
                c.min_radius,
                c.max_radius,
                c.boundary_margin,
                c.radius_rate,
                c.radius_tolerance
            ]),
            "Containment parameters must be finite"
        );
        anyhow::ensure!(c.min_radius > 0.0, "Minimum radius must be positive");
        anyhow::ensure!(
            c.min_radius <= c.radius && c.radius <= c.max_radius,
            "Containment radius must lie within [min_radius, max_radius]"
        );
        anyhow::ensure!(
            c.boundary_margin >= 0.0 && c.boundary_margin < c.min_radius,
            "Boundary margin must be in [0.0, min_radius)"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&c.radius_rate),
            "Radius rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            c.radius_tolerance >= 0.0,
            "Radius tolerance must be non-negative"
        );

        anyhow::ensure!(
            self.budget.energy_budget.is_finite() && self.budget.energy_budget > 0.0,
            "Energy budget must be positive"
        );

        anyhow::ensure!(
            self.display.telemetry_every > 0,
            "Telemetry cadence must be positive"
        );

        Ok(())
    }

    /// Parses and validates a preset from TOML. Missing sections and fields
    /// fall back to the defaults.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let preset = toml::from_str::<Self>(content)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Digest over everything that influences dynamics. Display switches and
    /// the name are excluded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.field).as_bytes());
        hasher.update(format!("{:?}", self.probes).as_bytes());
        hasher.update(format!("{:?}", self.anchors).as_bytes());
        hasher.update(format!("{:?}", self.basins).as_bytes());
        hasher.update(format!("{:?}", self.lifecycle).as_bytes());
        hasher.update(format!("{:?}", self.containment).as_bytes());
        hasher.update(format!("{:?}", self.budget).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_validates() {
        let preset = StagePreset::default();
        assert!(preset.validate().is_ok());
    }

    #[test]
    fn test_invalid_dwell_window() {
        let preset = StagePreset {
            lifecycle: LifecycleConfig {
                dwell_window: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(preset.validate().is_err());
    }

    #[test]
    fn test_invalid_senescence_rate() {
        let mut preset = StagePreset::default();
        preset.lifecycle.senescence_rate = -1.0;
        assert!(preset.validate().is_err());
        preset.lifecycle.senescence_rate = f64::NAN;
        assert!(preset.validate().is_err());
        preset.lifecycle.senescence_rate = 0.0;
        assert!(preset.validate().is_ok());
    }

    #[test]
    fn test_invalid_breakpoints() {
        let preset = StagePreset {
            lifecycle: LifecycleConfig {
                phase_breakpoints: [50, 50, 200],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(preset.validate().is_err());
    }

    #[test]
    fn test_radius_outside_limits() {
        let preset = StagePreset {
            containment: ContainmentConfig {
                radius: 2.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(preset.validate().is_err());
    }

    #[test]
    fn test_non_finite_field_parameter() {
        let preset = StagePreset {
            field: FieldConfig {
                probe_sigma: f64::NAN,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(preset.validate().is_err());
    }

    #[test]
    fn test_duplicate_anchor_ids() {
        let preset = StagePreset {
            anchors: AnchorConfig {
                layout: vec![AnchorSpec::new("B", 0.0, 0.0), AnchorSpec::new("B", 0.1, 0.0)],
                jitter: 0.0,
            },
            ..Default::default()
        };
        assert!(preset.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let preset = StagePreset::from_toml(
            r#"
            name = "sparse"

            [probes]
            count = 64
            "#,
        )
        .unwrap();
        assert_eq!(preset.name, "sparse");
        assert_eq!(preset.probes.count, 64);
        assert_eq!(preset.probes.damping, ProbeConfig::default().damping);
        assert_eq!(preset.lifecycle, LifecycleConfig::default());
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        assert!(StagePreset::from_toml("[budget]\nenergy_budget = -1.0\n").is_err());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let a = StagePreset::default();
        let mut b = StagePreset::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.display.show_probes = false;
        b.name = "renamed".to_string();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.lifecycle.dwell_window += 1;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
