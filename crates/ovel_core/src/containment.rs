//! Disk containment centered at the world origin.
//!
//! A probe leaving the disk is projected back onto the circle and the outward
//! radial part of its velocity is reflected. With an adaptive bound the
//! radius follows the probe extent of the previous step, moving a fraction of
//! the gap per step and never leaving `[min_radius, max_radius]`.

use crate::config::ContainmentConfig;
use ovel_data::Vec2;
use serde::{Deserialize, Serialize};

/// What containment did during one step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainmentReport {
    pub radius: f64,
    pub world_clamps: u32,
    pub probe_clamps: u32,
    pub near_boundary_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Containment {
    radius: f64,
    /// Probe extent measured at the end of the previous step.
    last_extent: f64,
}

impl Containment {
    #[must_use]
    pub fn new(radius: f64, initial_extent: f64) -> Self {
        Self {
            radius,
            last_extent: initial_extent,
        }
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn record_extent(&mut self, extent: f64) {
        self.last_extent = extent;
    }

    /// Moves the radius toward the previous extent plus two margins.
    /// Returns `(from, to)` when the radius changed.
    pub fn adjust_radius(&mut self, config: &ContainmentConfig) -> Option<(f64, f64)> {
        if !config.adaptive {
            return None;
        }
        let desired = (self.last_extent + 2.0 * config.boundary_margin)
            .clamp(config.min_radius, config.max_radius);
        let gap = desired - self.radius;
        if gap.abs() <= config.radius_tolerance {
            return None;
        }
        let from = self.radius;
        self.radius = (self.radius + config.radius_rate * gap)
            .clamp(config.min_radius, config.max_radius);
        Some((from, self.radius))
    }

    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.length_squared() <= self.radius * self.radius
    }

    /// Clamped position and velocity for a candidate outside the disk.
    #[must_use]
    pub fn clamp_probe(&self, candidate: Vec2, velocity: Vec2) -> Option<(Vec2, Vec2)> {
        if self.contains(candidate) {
            return None;
        }
        let normal = candidate.try_normalize()?;
        let position = normal * self.radius;
        let outward = velocity.dot(normal);
        let velocity = if outward > 0.0 {
            velocity - normal * (2.0 * outward)
        } else {
            velocity
        };
        Some((position, velocity))
    }

    /// Projects a point onto the circle if it lies outside. Returns whether it
    /// moved.
    pub fn pull_inside(&self, p: &mut Vec2) -> bool {
        if self.contains(*p) {
            return false;
        }
        match p.try_normalize() {
            Some(normal) => {
                *p = normal * self.radius;
                true
            }
            None => false,
        }
    }

    /// Percentage (0-100) of points within `margin` of the boundary.
    #[must_use]
    pub fn near_boundary_pct<I>(&self, points: I, margin: f64) -> f64
    where
        I: IntoIterator<Item = Vec2>,
    {
        let inner = (self.radius - margin).max(0.0);
        let mut total = 0usize;
        let mut near = 0usize;
        for p in points {
            total += 1;
            if p.length() >= inner {
                near += 1;
            }
        }
        if total == 0 {
            0.0
        } else {
            100.0 * near as f64 / total as f64
        }
    }
}
