//! Built-in stages. The last entry is the default stage.

use crate::config::{
    AnchorConfig, AnchorSpec, BasinConfig, ColorMode, ContainmentConfig, DisplayConfig,
    FieldConfig, LifecycleConfig, ProbeConfig, StagePreset,
};

/// Name of the stage returned by `StagePreset::default()`.
pub const DEFAULT_STAGE: &str = "void-architecture";

fn genesis() -> StagePreset {
    StagePreset {
        name: "genesis".to_string(),
        probes: ProbeConfig {
            count: 96,
            noise_gain: 18.0,
            ..Default::default()
        },
        anchors: AnchorConfig {
            layout: vec![AnchorSpec::new("B", 0.0, 0.0)],
            jitter: 0.02,
        },
        containment: ContainmentConfig {
            adaptive: false,
            ..Default::default()
        },
        display: DisplayConfig {
            color_mode: ColorMode::Density,
            show_basins: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn drift() -> StagePreset {
    StagePreset {
        name: "drift".to_string(),
        probes: ProbeConfig {
            count: 160,
            damping: 0.95,
            swirl_gain: 7.0,
            ..Default::default()
        },
        basins: BasinConfig {
            drift: 0.05,
            decay: 0.93,
            ..Default::default()
        },
        display: DisplayConfig {
            show_probes: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn lattice() -> StagePreset {
    StagePreset {
        name: "lattice".to_string(),
        field: FieldConfig {
            anchor_sigma: 0.2,
            ..Default::default()
        },
        anchors: AnchorConfig {
            layout: vec![
                AnchorSpec::new("B", -0.4, 0.4),
                AnchorSpec::new("Ci", 0.4, 0.4),
                AnchorSpec::new("Di", -0.4, -0.4),
                AnchorSpec::new("Ei", 0.4, -0.4),
            ],
            jitter: 0.03,
        },
        lifecycle: LifecycleConfig {
            max_invariants: 32,
            region_size: 0.3,
            ..Default::default()
        },
        budget: crate::config::BudgetConfig {
            energy_budget: 90.0,
        },
        ..Default::default()
    }
}

/// All built-in stages, the default stage last.
#[must_use]
pub fn stage_presets() -> Vec<StagePreset> {
    vec![genesis(), drift(), lattice(), StagePreset::default()]
}

#[must_use]
pub fn preset_by_name(name: &str) -> Option<StagePreset> {
    stage_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

#[must_use]
pub fn preset_names() -> Vec<String> {
    stage_presets().into_iter().map(|p| p.name).collect()
}
